pub use host::HostInfo;
pub use record::{short_id, Columns, CommonFields, ContainerRecord, ProcessRecord, Snapshot};
pub use ui::{Mode, SortKey, ViewState, CHROME_ROWS};

mod host;
mod record;
mod ui;
