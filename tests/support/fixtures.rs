use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// Catalog with home-made base prices. Cutlass minus Aurora is $75.
pub const CATALOG_JSON: &str = r#"[
    { "name": "Aurora MR", "manufacturer": "RSI", "base_price": 25 },
    { "name": "Avenger Titan", "manufacturer": "Aegis", "base_price": 55 },
    { "name": "Cutlass Black", "manufacturer": "Drake", "base_price": 100 },
    { "name": "Constellation Andromeda", "manufacturer": "RSI", "base_price": 215 }
]"#;

/// Official store: only a pricey direct upgrade.
pub const RSI_FEED_JSON: &str = r#"{
    "listings": [
        { "ship": "Cutlass Black", "price": "100.00", "availability": "In stock" }
    ],
    "upgrades": [
        { "from": "Aurora MR", "to": "Cutlass Black", "price": "75.00", "availability": "In stock" }
    ]
}"#;

/// Grey market: a cheaper two-step route through the Titan.
pub const GREY_FEED_JSON: &str = r#"{
    "listings": [
        { "ship": "Cutlass Black", "price": 90, "availability": "In stock" }
    ],
    "upgrades": [
        { "from": "Aurora MR", "to": "Avenger Titan", "price": 20 },
        { "from": "Avenger Titan", "to": "Cutlass Black", "price": "40.00" }
    ]
}"#;

/// A temp workspace holding data files and a config pointing at them.
pub struct Workspace {
    pub dir: TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        write(dir.path(), "ships.json", CATALOG_JSON);
        write(dir.path(), "rsi.json", RSI_FEED_JSON);
        write(dir.path(), "grey.json", GREY_FEED_JSON);
        Self { dir }
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// Config with both file sources, a disk cache and a JSON alert store.
    pub fn config_toml(&self) -> String {
        format!(
            r#"
catalog = "{catalog}"

[cache]
directory = "{cache}"

[alerts]
store_path = "{alerts}"
throttle_ms = 0

[discord]
enabled = false

[[sources]]
kind = "file"
name = "rsi-fixture"
path = "{rsi}"
store = "rsi"

[[sources]]
kind = "file"
name = "grey-fixture"
path = "{grey}"
store = "grey"
"#,
            catalog = toml_path(&self.path("ships.json")),
            cache = toml_path(&self.path("cache")),
            alerts = toml_path(&self.path("alerts.json")),
            rsi = toml_path(&self.path("rsi.json")),
            grey = toml_path(&self.path("grey.json")),
        )
    }

    pub fn write_config(&self) -> PathBuf {
        let path = self.path("config.toml");
        fs::write(&path, self.config_toml()).expect("write config");
        path
    }
}

pub fn write(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).unwrap_or_else(|e| panic!("write {}: {e}", path.display()));
    path
}

fn toml_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}
