// Version information shown by `tripbot --version` and in startup logs

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = "Tripbot";

pub fn version_string() -> String {
    format!("v{}", VERSION)
}

pub fn full_version_info() -> String {
    format!("{} {}", NAME, version_string())
}
