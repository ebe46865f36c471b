use serde::Serialize;

/// Fields shared by container and process rows. All values are display-ready.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct CommonFields {
    pub id: String,      // full container id, or PID for a process
    pub command: String, // container CMD or process command line
    pub uptime: String,  // e.g. "2h 34m" or ps etime "01:02:03"
    pub status: String,  // container state or process state
    pub cpu: String,     // % CPU, one decimal for containers
    pub ram: String,     // % memory, one decimal for containers
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ProcessRecord {
    #[serde(flatten)]
    pub common: CommonFields,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ContainerRecord {
    pub name: String,
    pub image: String,
    #[serde(flatten)]
    pub common: CommonFields,
    pub selected: bool,
    pub expanded: bool,
    pub processes: Vec<ProcessRecord>,
    // Numeric twins of the display strings, used for ordering.
    #[serde(skip)]
    pub uptime_secs: u64,
    #[serde(skip)]
    pub cpu_total: f64,
    #[serde(skip)]
    pub ram_total: f64,
}

impl ContainerRecord {
    pub fn id(&self) -> &str {
        &self.common.id
    }

    /// First 12 characters of the container id, as `docker ps` shows it.
    pub fn short_id(&self) -> &str {
        short_id(&self.common.id)
    }
}

pub fn short_id(id: &str) -> &str {
    match id.char_indices().nth(12) {
        Some((idx, _)) => &id[..idx],
        None => id,
    }
}

/// Column accessors used by the row formatter. Processes have no name or image.
pub trait Columns {
    fn common(&self) -> &CommonFields;

    fn name(&self) -> &str {
        ""
    }

    fn image(&self) -> &str {
        ""
    }
}

impl Columns for ContainerRecord {
    fn common(&self) -> &CommonFields {
        &self.common
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn image(&self) -> &str {
        &self.image
    }
}

impl Columns for ProcessRecord {
    fn common(&self) -> &CommonFields {
        &self.common
    }
}

/// All containers as of one poll cycle. Container ids are unique.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Snapshot {
    pub containers: Vec<ContainerRecord>,
}

impl Snapshot {
    pub fn new(containers: Vec<ContainerRecord>) -> Self {
        Self { containers }
    }

    pub fn len(&self) -> usize {
        self.containers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.containers.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&ContainerRecord> {
        self.containers.iter().find(|c| c.id() == id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut ContainerRecord> {
        self.containers.iter_mut().find(|c| c.id() == id)
    }

    /// Ids of selected containers, in snapshot order.
    pub fn selected_ids(&self) -> Vec<String> {
        self.containers
            .iter()
            .filter(|c| c.selected)
            .map(|c| c.id().to_string())
            .collect()
    }

    pub fn selected_count(&self) -> usize {
        self.containers.iter().filter(|c| c.selected).count()
    }

    pub fn clear_selection(&mut self) {
        for c in &mut self.containers {
            c.selected = false;
        }
    }
}
