use super::*;

#[test]
fn preference_parses_case_insensitively() {
    assert_eq!("GPU".parse::<BackendPreference>().unwrap(), BackendPreference::Gpu);
    assert_eq!(" cpu ".parse::<BackendPreference>().unwrap(), BackendPreference::Cpu);
    assert_eq!("".parse::<BackendPreference>().unwrap(), BackendPreference::Auto);
    let err = "metal".parse::<BackendPreference>().unwrap_err();
    assert!(err.to_string().contains("metal"));
}

#[test]
fn preference_display_round_trips() {
    for pref in [
        BackendPreference::Auto,
        BackendPreference::Cpu,
        BackendPreference::Gpu,
    ] {
        assert_eq!(pref.to_string().parse::<BackendPreference>().unwrap(), pref);
    }
}

#[test]
fn cpu_preference_always_selects_cpu() {
    assert_eq!(
        BackendKind::detect(BackendPreference::Cpu, ExportSize::PREVIEW),
        BackendKind::Cpu
    );
}

#[cfg(not(feature = "gpu"))]
#[test]
fn gpu_preference_falls_back_without_the_feature() {
    assert_eq!(
        BackendKind::detect(BackendPreference::Gpu, ExportSize::BASE),
        BackendKind::Cpu
    );
}

#[test]
fn cpu_backend_is_always_constructible() {
    let backend = create_backend(BackendKind::Cpu).unwrap();
    assert_eq!(backend.kind(), BackendKind::Cpu);
}
