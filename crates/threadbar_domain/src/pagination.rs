/// Paging state mirrored from the thread-list loader for one list owner.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ThreadListPage {
    pub next_cursor: Option<String>,
    pub is_paging: bool,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadOlder {
    Hidden,
    Loading,
    Available,
}

impl ThreadListPage {
    pub fn load_older(&self) -> LoadOlder {
        match (&self.next_cursor, self.is_paging) {
            (None, _) => LoadOlder::Hidden,
            (Some(_), true) => LoadOlder::Loading,
            (Some(_), false) => LoadOlder::Available,
        }
    }
}
