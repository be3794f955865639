//! Process configuration: flags with environment fallbacks, checked at startup.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use grouppost_core::app::group_lister::DEFAULT_MAX_PAGES;
use grouppost_core::app::oauth::DEFAULT_DIALOG_BASE;
use grouppost_core::app::{App, AppBuilder, OAuthSettings};
use grouppost_core::impls::http_graph::{DEFAULT_GRAPH_BASE, DEFAULT_POST_URL_BASE};
use grouppost_core::impls::{GraphEndpoints, HttpGraphApi};

#[derive(Debug, Clone, Parser)]
#[command(
    name = "grouppost",
    about = "Post one message to many Facebook groups",
    version
)]
pub struct AppConfig {
    /// Public root URL of this app; the OAuth callback is `{root}auth/code`
    #[arg(long, env = "APP_ROOT")]
    pub app_root: String,

    /// OAuth client id issued by the provider
    #[arg(long, env = "CLIENT_ID")]
    pub client_id: String,

    /// OAuth client secret issued by the provider
    #[arg(long, env = "CLIENT_SECRET", hide_env_values = true)]
    pub client_secret: String,

    #[arg(long, env = "PORT")]
    pub port: u16,

    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    #[arg(long, env = "GRAPH_API_BASE", default_value = DEFAULT_GRAPH_BASE)]
    pub graph_api_base: String,

    #[arg(long, env = "OAUTH_DIALOG_BASE", default_value = DEFAULT_DIALOG_BASE)]
    pub oauth_dialog_base: String,

    /// Prefix for canonical post URLs
    #[arg(long, env = "POST_URL_BASE", default_value = DEFAULT_POST_URL_BASE)]
    pub post_url_base: String,

    /// Built browser client
    #[arg(long, env = "STATIC_DIR", default_value = "client/build")]
    pub static_dir: PathBuf,

    /// Per-group limit for fan-out posts; unset means no limit
    #[arg(long, env = "PUBLISH_TIMEOUT_SECS")]
    pub publish_timeout_secs: Option<u64>,

    /// Upper bound on group listing pages
    #[arg(long, env = "MAX_GROUP_PAGES", default_value_t = DEFAULT_MAX_PAGES)]
    pub max_group_pages: usize,
}

impl AppConfig {
    /// `app_root` with a guaranteed trailing slash.
    pub fn normalized_root(&self) -> String {
        if self.app_root.ends_with('/') {
            self.app_root.clone()
        } else {
            format!("{}/", self.app_root)
        }
    }

    pub fn oauth_settings(&self) -> OAuthSettings {
        OAuthSettings::new(&self.client_id, &self.client_secret, self.normalized_root())
            .with_dialog_base(&self.oauth_dialog_base)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        self.oauth_settings()
            .validate()
            .map_err(anyhow::Error::msg)
            .context("invalid OAuth configuration")?;
        anyhow::ensure!(
            self.graph_api_base.starts_with("http://") || self.graph_api_base.starts_with("https://"),
            "GRAPH_API_BASE must be an http(s) URL"
        );
        anyhow::ensure!(self.max_group_pages > 0, "MAX_GROUP_PAGES must be at least 1");
        anyhow::ensure!(
            self.publish_timeout_secs != Some(0),
            "PUBLISH_TIMEOUT_SECS must be positive when set"
        );
        Ok(())
    }

    pub fn bind_addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .context("invalid bind address")
    }

    pub fn build_app(&self) -> anyhow::Result<App> {
        let graph = HttpGraphApi::new(GraphEndpoints {
            graph_base: self.graph_api_base.clone(),
            post_url_base: self.post_url_base.clone(),
        });
        AppBuilder::new()
            .graph_api(Arc::new(graph))
            .oauth(self.oauth_settings())
            .max_group_pages(self.max_group_pages)
            .publish_timeout(self.publish_timeout_secs.map(Duration::from_secs))
            .build()
            .context("failed to build application")
    }
}
