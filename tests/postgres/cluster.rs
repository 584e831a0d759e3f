//! Cluster lifecycle helpers for `PostgreSQL` integration tests.
//!
//! Tests use the server named by `TASKTRACK_TEST_DATABASE_URL` when it is
//! set, and otherwise start one embedded cluster shared by the whole run.

use postgresql_embedded::{PostgreSQL, Settings, Status};
use rstest::fixture;
use std::sync::OnceLock;
use tokio::runtime::Runtime;

/// Boxed error type used by test fixtures.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Environment variable naming an external server to test against.
pub const TEST_DATABASE_URL_ENV: &str = "TASKTRACK_TEST_DATABASE_URL";

static SHARED_CLUSTER: OnceLock<ManagedCluster> = OnceLock::new();

/// Shared `PostgreSQL` cluster handle for integration tests.
pub type PostgresCluster = &'static ManagedCluster;

/// A running `PostgreSQL` server the tests may create schemas in.
pub struct ManagedCluster {
    admin_url: String,
    runtime: Option<Runtime>,
    postgres: Option<PostgreSQL>,
}

impl ManagedCluster {
    fn new() -> Result<Self, BoxError> {
        if let Ok(url) = std::env::var(TEST_DATABASE_URL_ENV) {
            return Ok(Self {
                admin_url: url,
                runtime: None,
                postgres: None,
            });
        }
        // Start-up drives its own runtime, so it cannot run on a thread that
        // is already inside the test's runtime.
        std::thread::spawn(Self::start_embedded)
            .join()
            .map_err(|_| -> BoxError { "embedded PostgreSQL start-up panicked".into() })?
    }

    fn start_embedded() -> Result<Self, BoxError> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()?;
        let mut postgres = PostgreSQL::new(Settings::default());
        runtime.block_on(async {
            postgres
                .setup()
                .await
                .map_err(|err| Box::new(err) as BoxError)?;
            if !matches!(postgres.status(), Status::Started) {
                postgres
                    .start()
                    .await
                    .map_err(|err| Box::new(err) as BoxError)?;
            }
            Ok::<(), BoxError>(())
        })?;
        let admin_url = postgres.settings().url("postgres");
        Ok(Self {
            admin_url,
            runtime: Some(runtime),
            postgres: Some(postgres),
        })
    }

    /// URL of a database the tests may create schemas in.
    #[must_use]
    pub fn admin_url(&self) -> &str {
        &self.admin_url
    }

    fn stop(&mut self) -> Result<(), BoxError> {
        let (Some(postgres), Some(runtime)) = (self.postgres.take(), self.runtime.as_ref()) else {
            return Ok(());
        };
        runtime.block_on(async {
            postgres
                .stop()
                .await
                .map_err(|err| Box::new(err) as BoxError)
        })
    }
}

impl Drop for ManagedCluster {
    fn drop(&mut self) {
        drop(self.stop());
    }
}

/// Provides the shared `PostgreSQL` cluster, starting it on first use.
///
/// # Panics
///
/// Panics with a `SKIP-TEST-CLUSTER` marker when no server can be started.
#[fixture]
pub fn postgres_cluster() -> PostgresCluster {
    SHARED_CLUSTER.get_or_init(|| match ManagedCluster::new() {
        Ok(cluster) => cluster,
        Err(err) => panic!("SKIP-TEST-CLUSTER: failed to start PostgreSQL: {err}"),
    })
}
