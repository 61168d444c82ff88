//! The four-stage resolution pipeline.
//!
//! One pass runs bootstrap → local → remote → compose, strictly in order; no
//! stage begins before the prior stage's result is available. Bootstrap and
//! local failures abort the pass; a remote failure degrades to an empty layer
//! so that remote unavailability never blocks startup.

use std::sync::Arc;

use serde_yaml::Value;
use tracing::{debug, info, warn};

use crate::error::{ConfigResult, Stage};
use crate::loader::{BOOTSTRAP_FILE, load_application, load_source};
use crate::merge::{get_nested, merge_all, normalize_paths, set_nested};
use crate::options::LoadOptions;
use crate::remote::{REMOTE_NAME_PATH, REMOTE_PROFILES_PATH, RemoteFetcher, RemoteOptions};
use crate::{PropertyTree, empty_tree};

/// The three source layers and the composed result of one resolution pass.
///
/// Owned exclusively by one pipeline invocation; never shared across
/// concurrent passes.
#[derive(Debug, Clone)]
pub struct ResolutionContext {
    /// The bootstrap layer, with the active profiles injected.
    pub bootstrap: PropertyTree,
    /// The local application layer.
    pub local: PropertyTree,
    /// The remote layer, or an empty tree if remote config is disabled or
    /// unavailable.
    pub remote: PropertyTree,
    /// `merge_all([bootstrap, local, remote])` — remote wins.
    pub composed: PropertyTree,
}

/// Runs resolution passes for one set of [`LoadOptions`].
pub struct Resolver {
    options: LoadOptions,
    fetcher: Arc<dyn RemoteFetcher>,
}

impl std::fmt::Debug for Resolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Resolver")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl Resolver {
    /// Validate the options and build a resolver.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ConfigError::InvalidOptions`] before any I/O when the
    /// required options are missing.
    pub fn new(options: LoadOptions, fetcher: Arc<dyn RemoteFetcher>) -> ConfigResult<Self> {
        options.validate()?;
        Ok(Self { options, fetcher })
    }

    /// The options this resolver was built with.
    #[must_use]
    pub fn options(&self) -> &LoadOptions {
        &self.options
    }

    /// Run one pass and return the composed tree.
    ///
    /// # Errors
    ///
    /// The first fatal error encountered, annotated with the stage that
    /// produced it.
    pub async fn resolve(&self) -> ConfigResult<PropertyTree> {
        Ok(self.resolve_pass().await?.composed)
    }

    /// Run one pass and return all four trees.
    ///
    /// # Errors
    ///
    /// See [`Resolver::resolve`].
    pub async fn resolve_pass(&self) -> ConfigResult<ResolutionContext> {
        let active = &self.options.active_profiles;

        // Bootstrap stage: load, then record which profiles were requested so
        // the remote collaborator knows what to ask for.
        let bootstrap_file = self.options.bootstrap_dir().join(BOOTSTRAP_FILE);
        let mut bootstrap = load_source(&bootstrap_file, active)
            .await
            .map_err(|e| e.at_stage(Stage::Bootstrap))?;
        let requested: Vec<Value> = active.iter().map(|p| Value::String(p.clone())).collect();
        set_nested(&mut bootstrap, REMOTE_PROFILES_PATH, Value::Sequence(requested));

        // Local stage. Local config can rename the logical application for
        // remote lookup purposes.
        let local = load_application(&self.options.config_path, active)
            .await
            .map_err(|e| e.at_stage(Stage::Local))?;
        if let Some(name) = get_nested(&local, REMOTE_NAME_PATH) {
            debug!(name = ?name, "local config overrides remote lookup name");
            set_nested(&mut bootstrap, REMOTE_NAME_PATH, name.clone());
        }

        // Remote stage: degrades, never aborts.
        let remote = self.fetch_remote(&bootstrap).await;

        // Compose stage: bootstrap lowest precedence, remote highest.
        let composed = merge_all([bootstrap.clone(), local.clone(), remote.clone()]);
        info!(
            profiles = ?active,
            "configuration resolved"
        );

        Ok(ResolutionContext {
            bootstrap,
            local,
            remote,
            composed,
        })
    }

    /// Run the remote stage. Any failure — disabled remote, malformed
    /// options, fetcher error — yields an empty layer.
    async fn fetch_remote(&self, bootstrap: &PropertyTree) -> PropertyTree {
        let Some(options) = RemoteOptions::from_tree(bootstrap) else {
            return empty_tree();
        };
        if !options.enabled {
            debug!("remote config disabled, skipping fetch");
            return empty_tree();
        }

        match self.fetcher.fetch(&options).await {
            Ok(payload) => normalize_paths(&payload),
            Err(err) => {
                warn!(error = %err, "remote fetch failed, continuing without remote config");
                empty_tree()
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use async_trait::async_trait;

    use super::*;
    use crate::remote::{NoRemote, RemoteFetchError};

    struct StaticFetcher(PropertyTree);

    #[async_trait]
    impl RemoteFetcher for StaticFetcher {
        async fn fetch(&self, _options: &RemoteOptions) -> Result<PropertyTree, RemoteFetchError> {
            Ok(self.0.clone())
        }
    }

    struct FailingFetcher;

    #[async_trait]
    impl RemoteFetcher for FailingFetcher {
        async fn fetch(&self, _options: &RemoteOptions) -> Result<PropertyTree, RemoteFetchError> {
            Err(RemoteFetchError::new("connection refused"))
        }
    }

    fn yaml(text: &str) -> Value {
        serde_yaml::from_str(text).unwrap()
    }

    fn write(dir: &Path, name: &str, content: &str) {
        std::fs::write(dir.join(name), content).unwrap();
    }

    fn options(dir: &Path, profiles: &[&str]) -> LoadOptions {
        LoadOptions::new(dir, profiles.iter().map(|s| (*s).to_owned()).collect())
    }

    #[tokio::test]
    async fn test_missing_bootstrap_is_annotated() {
        let dir = tempfile::tempdir().unwrap();
        let resolver = Resolver::new(options(dir.path(), &[]), Arc::new(NoRemote)).unwrap();

        let err = resolver.resolve().await.unwrap_err();
        assert!(matches!(
            err,
            crate::ConfigError::Stage {
                stage: Stage::Bootstrap,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_missing_application_is_annotated() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "bootstrap.yml", "app: boot\n");
        let resolver = Resolver::new(options(dir.path(), &[]), Arc::new(NoRemote)).unwrap();

        let err = resolver.resolve().await.unwrap_err();
        assert!(matches!(
            err,
            crate::ConfigError::Stage {
                stage: Stage::Local,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_profiles_injected_into_bootstrap() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "bootstrap.yml", "app: boot\n");
        write(dir.path(), "application.yml", "app: local\n");
        let resolver =
            Resolver::new(options(dir.path(), &["dev", "qa"]), Arc::new(NoRemote)).unwrap();

        let context = resolver.resolve_pass().await.unwrap();
        assert_eq!(
            get_nested(&context.bootstrap, REMOTE_PROFILES_PATH).unwrap(),
            &yaml("[dev, qa]")
        );
    }

    #[tokio::test]
    async fn test_remote_failure_degrades() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "bootstrap.yml",
            "remote:\n  enabled: true\nkey: boot\n",
        );
        write(dir.path(), "application.yml", "local: yes\n");
        let resolver = Resolver::new(options(dir.path(), &[]), Arc::new(FailingFetcher)).unwrap();

        let context = resolver.resolve_pass().await.unwrap();
        assert_eq!(context.remote, empty_tree());
        assert_eq!(context.composed.get("key").unwrap().as_str(), Some("boot"));
    }

    #[tokio::test]
    async fn test_remote_highest_precedence() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "bootstrap.yml",
            "remote:\n  enabled: true\nkey: boot\n",
        );
        write(dir.path(), "application.yml", "key: local\n");
        let fetcher = StaticFetcher(yaml("key: remote"));
        let resolver = Resolver::new(options(dir.path(), &[]), Arc::new(fetcher)).unwrap();

        let composed = resolver.resolve().await.unwrap();
        assert_eq!(composed.get("key").unwrap().as_str(), Some("remote"));
    }

    #[tokio::test]
    async fn test_remote_payload_normalized() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "bootstrap.yml", "remote:\n  enabled: true\n");
        write(dir.path(), "application.yml", "a: 1\n");
        let fetcher = StaticFetcher(yaml("server.port: 9000"));
        let resolver = Resolver::new(options(dir.path(), &[]), Arc::new(fetcher)).unwrap();

        let composed = resolver.resolve().await.unwrap();
        assert_eq!(
            get_nested(&composed, &["server", "port"]).unwrap(),
            &yaml("9000")
        );
    }

    #[tokio::test]
    async fn test_remote_disabled_skips_fetch() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "bootstrap.yml", "remote:\n  enabled: false\n");
        write(dir.path(), "application.yml", "a: 1\n");
        let fetcher = StaticFetcher(yaml("should: not appear"));
        let resolver = Resolver::new(options(dir.path(), &[]), Arc::new(fetcher)).unwrap();

        let composed = resolver.resolve().await.unwrap();
        assert!(composed.get("should").is_none());
    }

    #[tokio::test]
    async fn test_local_name_override_copied_to_bootstrap() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "bootstrap.yml",
            "remote:\n  enabled: true\n  name: original\n",
        );
        write(dir.path(), "application.yml", "remote:\n  name: renamed\n");
        let resolver = Resolver::new(options(dir.path(), &[]), Arc::new(NoRemote)).unwrap();

        let context = resolver.resolve_pass().await.unwrap();
        assert_eq!(
            get_nested(&context.bootstrap, REMOTE_NAME_PATH)
                .unwrap()
                .as_str(),
            Some("renamed")
        );
    }

    #[tokio::test]
    async fn test_bootstrap_falls_back_to_config_path() {
        let boot_dir = tempfile::tempdir().unwrap();
        let config_dir = tempfile::tempdir().unwrap();
        write(boot_dir.path(), "bootstrap.yml", "from: bootstrap_dir\n");
        write(config_dir.path(), "application.yml", "a: 1\n");

        let opts = options(config_dir.path(), &[]).with_bootstrap_path(boot_dir.path());
        let resolver = Resolver::new(opts, Arc::new(NoRemote)).unwrap();
        let composed = resolver.resolve().await.unwrap();
        assert_eq!(
            composed.get("from").unwrap().as_str(),
            Some("bootstrap_dir")
        );
    }
}
