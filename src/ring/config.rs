use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Default number of virtual nodes per physical node.
pub const DEFAULT_REPLICAS: usize = 20;
/// Default separator between a node's identifier and its virtual node index.
pub const DEFAULT_SEPARATOR: char = '#';

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
/// Ring Configurations
pub struct Config {
    /// Number of virtual nodes created for each physical node, unless
    /// overridden per node with [crate::HashRing::add_node_with_replicas].
    ///
    /// More virtual nodes smooth out the share of the keyspace owned by each
    /// physical node, at the cost of a larger ring.
    ///
    /// Defaults to [DEFAULT_REPLICAS]
    pub replicas: usize,
    /// Separator used to derive virtual node identifiers, `"{node}{separator}{index}"`.
    ///
    /// Changing it moves every virtual node, so all rings sharing a key space
    /// must agree on it.
    ///
    /// Defaults to [DEFAULT_SEPARATOR]
    pub separator: char,
}

impl Config {
    pub(crate) fn validate(&self) -> Result<()> {
        if self.replicas == 0 {
            return Err(Error::InvalidReplicas(self.replicas));
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            replicas: DEFAULT_REPLICAS,
            separator: DEFAULT_SEPARATOR,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn default_is_valid() {
        let config = Config::default();

        assert_eq!(config.replicas, DEFAULT_REPLICAS);
        assert_eq!(config.separator, DEFAULT_SEPARATOR);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_replicas() {
        let config = Config {
            replicas: 0,
            ..Default::default()
        };

        assert_eq!(config.validate(), Err(Error::InvalidReplicas(0)));
    }

    #[test]
    fn deserialize_partial() {
        let config: Config = serde_json::from_str(r#"{ "replicas": 5 }"#).unwrap();

        assert_eq!(config.replicas, 5);
        assert_eq!(config.separator, DEFAULT_SEPARATOR);

        let config: Config = serde_json::from_str(r#"{ "separator": "-" }"#).unwrap();

        assert_eq!(config.replicas, DEFAULT_REPLICAS);
        assert_eq!(config.separator, '-');
    }
}
