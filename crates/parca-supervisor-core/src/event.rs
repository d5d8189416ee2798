/// Triggers delivered by the surrounding event framework.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AgentEvent {
    Install,
    Upgrade,
    Start,
    Stop,
    Remove,
    UpdateStatus,
    StoreChanged,
    StoreRemoved,
    CertificatesChanged,
    ConfigChanged,
}

impl AgentEvent {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Install => "install",
            Self::Upgrade => "upgrade",
            Self::Start => "start",
            Self::Stop => "stop",
            Self::Remove => "remove",
            Self::UpdateStatus => "update-status",
            Self::StoreChanged => "store-changed",
            Self::StoreRemoved => "store-removed",
            Self::CertificatesChanged => "certificates-changed",
            Self::ConfigChanged => "config-changed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Install,
    Refresh,
    Start,
    Stop,
    Remove,
    HoldAndReport,
    Reconcile,
}

impl Action {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Install => "install",
            Self::Refresh => "refresh",
            Self::Start => "start",
            Self::Stop => "stop",
            Self::Remove => "remove",
            Self::HoldAndReport => "hold-and-report",
            Self::Reconcile => "reconcile",
        }
    }

    /// Whether a convergence pass follows the action. A removed package has
    /// nothing left to converge, and a stopped one must not be restarted by a
    /// certificate change.
    pub fn reconciles(self) -> bool {
        !matches!(self, Self::Remove | Self::Stop)
    }

    pub fn maintenance_message(self) -> &'static str {
        match self {
            Self::Install => "installing parca-agent",
            Self::Refresh => "refreshing parca-agent",
            Self::Start => "starting parca-agent",
            Self::Stop => "stopping parca-agent",
            Self::Remove => "removing parca-agent",
            Self::HoldAndReport => "checking parca-agent",
            Self::Reconcile => "reconfiguring parca-agent",
        }
    }
}

pub fn handle_event(event: &AgentEvent) -> Action {
    match event {
        AgentEvent::Install => Action::Install,
        AgentEvent::Upgrade => Action::Refresh,
        AgentEvent::Start => Action::Start,
        AgentEvent::Stop => Action::Stop,
        AgentEvent::Remove => Action::Remove,
        AgentEvent::UpdateStatus => Action::HoldAndReport,
        AgentEvent::StoreChanged
        | AgentEvent::StoreRemoved
        | AgentEvent::CertificatesChanged
        | AgentEvent::ConfigChanged => Action::Reconcile,
    }
}
