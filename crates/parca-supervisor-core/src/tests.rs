use super::*;

fn all_events() -> [AgentEvent; 10] {
    [
        AgentEvent::Install,
        AgentEvent::Upgrade,
        AgentEvent::Start,
        AgentEvent::Stop,
        AgentEvent::Remove,
        AgentEvent::UpdateStatus,
        AgentEvent::StoreChanged,
        AgentEvent::StoreRemoved,
        AgentEvent::CertificatesChanged,
        AgentEvent::ConfigChanged,
    ]
}

fn healthy_observation() -> StatusObservation {
    StatusObservation {
        has_store_config: true,
        installed: true,
        running: true,
        target_revision: Some(2587),
        current_revision: Some(2587),
    }
}

#[test]
fn resolve_known_architectures() {
    for raw in ["x86_64", "amd64"] {
        assert_eq!(Arch::resolve(raw), Arch::Amd64, "raw={raw}");
    }
    for raw in ["aarch64", "arm64", "armv8b", "armv8l"] {
        assert_eq!(Arch::resolve(raw), Arch::Arm64, "raw={raw}");
    }
}

#[test]
fn resolve_unknown_architecture_passes_through() {
    let arch = Arch::resolve("riscv64");
    assert_eq!(arch, Arch::Other("riscv64".to_string()));
    assert_eq!(arch.to_string(), "riscv64");
}

#[test]
fn catalog_has_classic_amd64_revision() {
    assert_eq!(
        lookup_revision(Confinement::Classic, &Arch::Amd64),
        Some(2587)
    );
}

#[test]
fn catalog_misses_every_other_pair() {
    let pairs = [
        (Confinement::Classic, Arch::Arm64),
        (Confinement::Strict, Arch::Amd64),
        (Confinement::Strict, Arch::Arm64),
        (Confinement::Classic, Arch::Other("s390x".to_string())),
        (Confinement::Classic, Arch::Other("x86_64".to_string())),
    ];
    for (confinement, arch) in pairs {
        assert_eq!(
            lookup_revision(confinement, &arch),
            None,
            "{confinement}/{arch} should be unsupported"
        );
    }
}

#[test]
fn parse_prerelease_version_banner() {
    let banner =
        "parca-agent, version v0.12.0-next (commit: e888718c206a5dd63d476849c7349a0352547f1a)\n";
    assert_eq!(
        parse_version_banner(banner).expect("must parse"),
        "v0.12.0-next+e88871"
    );
}

#[test]
fn parse_released_version_banner() {
    let banner =
        "parca-agent, version v0.12.0 (commit: e888718c206a5dd63d476849c7349a0352547f1a)\n";
    assert_eq!(parse_version_banner(banner).expect("must parse"), "v0.12.0");
}

#[test]
fn parse_prerelease_banner_with_short_commit() {
    let banner = "parca-agent, version v0.35.0-next (commit: abc)\n";
    assert_eq!(
        parse_version_banner(banner).expect("must parse"),
        "v0.35.0-next+abc"
    );
}

#[test]
fn parse_version_banner_rejects_truncated_input() {
    for banner in ["", "parca-agent, version", "parca-agent, version v0.12.0 (commit:"] {
        let err = parse_version_banner(banner).expect_err("must reject truncated banner");
        assert!(
            matches!(err, SupervisorError::MalformedVersionBanner(_)),
            "unexpected error for '{banner}': {err}"
        );
    }
}

#[test]
fn parse_version_banner_rejects_empty_commit() {
    let err = parse_version_banner("parca-agent, version v0.12.0-next (commit: )\n")
        .expect_err("punctuation-only commit must be rejected");
    assert!(err.to_string().contains("missing commit hash"), "{err}");
}

#[test]
fn summarize_healthy_is_active() {
    assert_eq!(
        summarize(&healthy_observation()),
        UnitStatus::Active(String::new())
    );
}

#[test]
fn summarize_without_store_is_blocked_regardless_of_package() {
    for installed in [false, true] {
        for running in [false, true] {
            for current_revision in [None, Some(1), Some(2587)] {
                let observation = StatusObservation {
                    has_store_config: false,
                    installed,
                    running,
                    target_revision: Some(2587),
                    current_revision,
                };
                assert_eq!(
                    summarize(&observation),
                    UnitStatus::Blocked(NO_STORE_MESSAGE.to_string())
                );
            }
        }
    }
}

#[test]
fn summarize_reports_first_failing_check() {
    let mut observation = healthy_observation();
    observation.installed = false;
    observation.running = false;
    observation.current_revision = None;
    assert_eq!(
        summarize(&observation),
        UnitStatus::Blocked(NOT_INSTALLED_MESSAGE.to_string())
    );

    let mut observation = healthy_observation();
    observation.running = false;
    observation.current_revision = Some(1);
    let status = summarize(&observation);
    assert!(status.is_blocked());
    assert!(status.message().contains("not running"), "{status:?}");

    let mut observation = healthy_observation();
    observation.current_revision = Some(2500);
    assert_eq!(
        summarize(&observation),
        UnitStatus::Blocked(REVISION_MISMATCH_MESSAGE.to_string())
    );
}

#[test]
fn summarize_unsupported_platform_never_active() {
    let mut observation = healthy_observation();
    observation.target_revision = None;
    assert_eq!(
        summarize(&observation),
        UnitStatus::Blocked(REVISION_MISMATCH_MESSAGE.to_string())
    );
}

#[test]
fn observed_state_feeds_summarizer() {
    let observed = ObservedPackageState {
        present: true,
        revision: Some(2587),
        running: true,
        target_revision: Some(2587),
    };
    assert_eq!(observed.with_store(true), healthy_observation());
    assert!(summarize(&observed.with_store(false)).is_blocked());
}

#[test]
fn unit_status_serializes_tagged() {
    let status = UnitStatus::Blocked(NOT_RUNNING_MESSAGE.to_string());
    assert_eq!(status.name(), "blocked");
    assert_eq!(status.message(), NOT_RUNNING_MESSAGE);
    assert_eq!(UnitStatus::Active(String::new()).name(), "active");
}

#[test]
fn store_config_values_cover_fixed_keys() {
    let store = StoreConfig {
        address: "grpc.polarsignals.com:443".to_string(),
        bearer_token: "deadbeef".to_string(),
        insecure: "false".to_string(),
    };
    let values = store.to_values();
    assert_eq!(values.len(), STORE_CONFIG_KEYS.len());
    assert_eq!(
        values.get(REMOTE_STORE_ADDRESS).map(String::as_str),
        Some("grpc.polarsignals.com:443")
    );
    assert_eq!(
        values.get(REMOTE_STORE_BEARER_TOKEN).map(String::as_str),
        Some("deadbeef")
    );
    assert_eq!(store.get("unrelated-key"), None);
}

#[test]
fn store_config_debug_redacts_token() {
    let store = StoreConfig {
        address: "grpc.polarsignals.com:443".to_string(),
        bearer_token: "deadbeef".to_string(),
        insecure: "false".to_string(),
    };
    let rendered = format!("{store:?}");
    assert!(!rendered.contains("deadbeef"), "{rendered}");
    assert!(rendered.contains("<redacted>"), "{rendered}");
}

#[test]
fn desired_state_distinguishes_absent_from_blank_store() {
    let absent = DesiredState::default();
    let blank = DesiredState {
        store: Some(StoreConfig::default()),
        ..DesiredState::default()
    };
    assert!(!absent.has_store());
    assert!(blank.has_store());
    assert_ne!(absent, blank);
}

#[test]
fn every_event_maps_to_an_action() {
    for event in all_events() {
        let action = handle_event(&event);
        let expected = !matches!(event, AgentEvent::Remove | AgentEvent::Stop);
        assert_eq!(action.reconciles(), expected, "{event:?}");
        assert!(!action.maintenance_message().is_empty());
        assert!(!action.as_str().contains(' '), "{}", action.as_str());
    }
}

#[test]
fn relation_events_reconcile() {
    for event in [
        AgentEvent::StoreChanged,
        AgentEvent::StoreRemoved,
        AgentEvent::CertificatesChanged,
        AgentEvent::ConfigChanged,
    ] {
        assert_eq!(handle_event(&event), Action::Reconcile, "{}", event.as_str());
    }
    assert_eq!(handle_event(&AgentEvent::Upgrade), Action::Refresh);
    assert_eq!(
        handle_event(&AgentEvent::UpdateStatus),
        Action::HoldAndReport
    );
}

#[test]
fn unsupported_platform_error_names_pair() {
    let err = SupervisorError::UnsupportedPlatform {
        confinement: Confinement::Classic,
        arch: Arch::Arm64,
    };
    let message = err.to_string();
    assert!(message.contains("classic"), "{message}");
    assert!(message.contains("arm64"), "{message}");
}
