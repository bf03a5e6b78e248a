use strum::{Display, EnumIter, EnumString};

/// Pages this runner can start, by the name the host uses for them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum PageName {
    #[default]
    Puzzle,
}

impl PageName {
    pub fn run(self) {
        match self {
            Self::Puzzle => puzzle_page::run(),
        }
    }
}
