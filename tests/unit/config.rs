use std::collections::HashMap;

use super::*;

fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<OsString> {
    let map: HashMap<String, OsString> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), OsString::from(v)))
        .collect();
    move |key| map.get(key).cloned()
}

#[test]
fn defaults_without_variables() {
    let opts = RendererOpts::from_lookup(lookup(&[]));
    assert_eq!(opts, RendererOpts::default());
    assert_eq!(opts.assets_root, PathBuf::from("."));
    assert_eq!(opts.backend, BackendPreference::Auto);
}

#[test]
fn variables_override_defaults() {
    let dirs = std::env::join_paths(["/opt/fonts", "/usr/local/fonts"]).unwrap();
    let dirs = dirs.to_string_lossy().into_owned();
    let opts = RendererOpts::from_lookup(lookup(&[
        (FONT_DIRS_ENV, &dirs),
        (ASSETS_ROOT_ENV, "/srv/covers"),
        (BACKEND_ENV, "cpu"),
    ]));
    assert_eq!(
        opts.font_dirs,
        vec![PathBuf::from("/opt/fonts"), PathBuf::from("/usr/local/fonts")]
    );
    assert_eq!(opts.assets_root, PathBuf::from("/srv/covers"));
    assert_eq!(opts.backend, BackendPreference::Cpu);
}

#[test]
fn unknown_backend_falls_back_to_auto() {
    let opts = RendererOpts::from_lookup(lookup(&[(BACKEND_ENV, "vulkan")]));
    assert_eq!(opts.backend, BackendPreference::Auto);
}

#[test]
fn opts_deserialize_with_missing_keys() {
    let opts: RendererOpts = serde_json::from_str(r#"{"backend":"gpu"}"#).unwrap();
    assert_eq!(opts.backend, BackendPreference::Gpu);
    assert!(opts.font_dirs.is_empty());
}
