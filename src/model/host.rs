use chrono::Local;
use sysinfo::System;

/// Host summary shown in the header line.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HostInfo {
    pub time: String,
    pub uptime_secs: u64,
    pub load_avg: (f64, f64, f64),
}

impl HostInfo {
    pub fn collect() -> Self {
        let load = System::load_average();
        Self {
            time: Local::now().format("%H:%M:%S").to_string(),
            uptime_secs: System::uptime(),
            load_avg: (load.one, load.five, load.fifteen),
        }
    }
}
