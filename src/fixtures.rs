#[cfg(test)]
pub mod test {
    use std::path::Path;

    use confique::Config;

    use crate::tree::ConfigTree;

    /// Bundled `config.yml` as shipped with the current release.
    pub const CONFIG_TEMPLATE: &str = "\
# ElytraGuard configuration
# Config version - do not modify
config_version: 5

# Print extra diagnostics to the console
debug: false  # enables verbose logs

# Which enchantments may be applied to elytra
enchantments:
  # allow unbreaking
  UNBREAKING: true
  MENDING: true
  THORNS: false

protection:
  # Damage reduction per level
  per_level: 0.04
  max_reduction: 0.6

# Worlds where the rules apply
worlds:
  - world
  - world_nether

update-checker:
  enabled: true
  notify-ops: true
";

    /// A hand-edited `config.yml` from an older release.
    pub const CONFIG_USER_V3: &str = "\
config_version: 3
debug: true
enchantments:
  MENDING: false
  THORNS: true
worlds:
  - minecraft:overworld
  - creative
legacy_option: 5
update-checker:
  enabled: false
  interval: 60
";

    /// Bundled `messages.yml`.
    pub const MESSAGES_TEMPLATE: &str = "\
# Chat messages. Color codes use '&'.
# Messages version - do not modify
messages_version: 2

prefix: \"&8[&bElytra&8] \"
no-permission: \"&cYou do not have permission.\"
reloaded: \"&aConfiguration reloaded.\"
update-available: \"&eUpdate available: %latest% (current %current%)\"
";

    pub const MESSAGES_USER_V1: &str = "\
messages_version: 1
prefix: \"&7[Elytra] \"
no-permission: \"&4Nope.\"
";

    pub fn tree(text: &str) -> ConfigTree {
        ConfigTree::parse(text, Path::new("test.yml")).unwrap()
    }

    pub fn lines(text: &str) -> Vec<&str> {
        text.lines().collect()
    }

    pub fn reserved() -> Vec<String> {
        vec!["config_version".to_string(), "messages_version".to_string()]
    }

    /// Typed view of [`CONFIG_TEMPLATE`] used by live-config tests.
    #[derive(Config, Debug, PartialEq)]
    pub struct GuardConfig {
        #[config(default = 1)]
        pub config_version: i64,

        #[config(default = false)]
        pub debug: bool,

        #[config(nested)]
        pub protection: ProtectionConfig,

        pub worlds: Option<Vec<String>>,
    }

    #[derive(Config, Debug, PartialEq)]
    pub struct ProtectionConfig {
        #[config(default = 0.04)]
        pub per_level: f64,

        #[config(default = 0.6)]
        pub max_reduction: f64,
    }

    #[test]
    fn fixtures_parse() {
        assert_eq!(tree(CONFIG_TEMPLATE).get_int("config_version"), Some(5));
        assert_eq!(tree(CONFIG_USER_V3).get_int("config_version"), Some(3));
        assert_eq!(tree(MESSAGES_TEMPLATE).get_int("messages_version"), Some(2));
        assert!(tree(MESSAGES_USER_V1).contains("prefix"));
    }

    #[test]
    fn guard_config_loads_defaults() {
        let config = GuardConfig::builder().load().unwrap();
        assert!(!config.debug);
        assert_eq!(config.protection.per_level, 0.04);
        assert_eq!(config.worlds, None);
    }
}
