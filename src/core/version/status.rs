/// Result of comparing the remote manifest with the local marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateStatus {
    NotInstalled,
    UpToDate,
    UpdateAvailable,
}

impl UpdateStatus {
    pub fn compare(latest_build: &str, installed_build: Option<&str>) -> Self {
        match installed_build {
            None => UpdateStatus::NotInstalled,
            Some(installed) if installed == latest_build => UpdateStatus::UpToDate,
            Some(_) => UpdateStatus::UpdateAvailable,
        }
    }

    pub fn is_up_to_date(self) -> bool {
        self == UpdateStatus::UpToDate
    }
}

/// Label on the control button. All three run the same fetch-and-extract path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlAction {
    Install,
    Update,
    Repair,
}

impl ControlAction {
    /// `installed` means both the marker and the install directory exist.
    pub fn for_state(installed: bool, status: UpdateStatus) -> Self {
        if !installed {
            return ControlAction::Install;
        }
        match status {
            UpdateStatus::UpToDate => ControlAction::Repair,
            UpdateStatus::UpdateAvailable | UpdateStatus::NotInstalled => ControlAction::Update,
        }
    }
}

impl std::fmt::Display for ControlAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ControlAction::Install => write!(f, "Install"),
            ControlAction::Update => write!(f, "Update"),
            ControlAction::Repair => write!(f, "Repair"),
        }
    }
}
