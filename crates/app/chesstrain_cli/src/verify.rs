//! Deployment self-check.

use std::path::Path;

use chesstrain_core::auth::jwt::{SECRET_KEY_ENV, TokenIssuer, TokenSecret};
use chesstrain_core::auth::password::{BCRYPT_MAX_PASSWORD_BYTES, CredentialHasher, verify_password};
use chesstrain_core::db;
use log::{info, warn};

use crate::cli::VerifyArgs;
use crate::{Error, Result};

const SAMPLE_PASSWORD: &str = "test_password_123";
const SAMPLE_USER: &str = "testuser";

/// Findings of a verification run. Only errors fail it.
#[derive(Debug, Default)]
pub struct Report {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl Report {
    fn pass(&self, message: &str) {
        info!("  ok: {message}");
    }

    fn fail(&mut self, message: impl Into<String>) {
        let message = message.into();
        info!("  FAILED: {message}");
        self.errors.push(message);
    }

    fn warn(&mut self, message: impl Into<String>) {
        let message = message.into();
        warn!("{message}");
        self.warnings.push(message);
    }

    /// Print the totals; `Err` when any check failed.
    pub fn summarize(&self) -> Result<()> {
        info!(
            "{} error(s), {} warning(s)",
            self.errors.len(),
            self.warnings.len()
        );
        if self.errors.is_empty() {
            info!("deployment verified");
            Ok(())
        } else {
            Err(Error::Custom(format!(
                "verification failed: {}",
                self.errors.join("; ")
            )))
        }
    }
}

pub async fn run(args: &VerifyArgs) -> Report {
    let mut report = Report::default();

    info!("Checking password hashing (cost {})...", args.bcrypt_cost);
    if let Err(e) = check_passwords(&mut report, args.bcrypt_cost) {
        report.fail(format!("password hashing: {e}"));
    }

    info!("Checking access tokens...");
    let secret = TokenSecret::from_env();
    if secret.is_fallback() {
        report.warn(format!(
            "{SECRET_KEY_ENV} is not set; tokens are signed with the built-in development key"
        ));
    }
    if let Err(e) = check_tokens(&mut report, &secret) {
        report.fail(format!("token round trip: {e}"));
    }

    info!("Checking database...");
    if let Err(e) = check_database(&mut report).await {
        report.fail(format!("database: {e}"));
    }

    info!("Checking configuration...");
    check_env_file(&mut report, &args.dir);

    report
}

fn check_passwords(report: &mut Report, cost: u32) -> Result<()> {
    let hasher = CredentialHasher::with_cost(cost);

    let hash = hasher.hash(SAMPLE_PASSWORD)?;
    if verify_password(SAMPLE_PASSWORD, &hash) && !verify_password("wrong", &hash) {
        report.pass("password hashing works");
    } else {
        report.fail("password verification returned the wrong answer");
    }

    let long = "x".repeat(BCRYPT_MAX_PASSWORD_BYTES + 28);
    let hash = hasher.hash(&long)?;
    if verify_password(&long, &hash) && !verify_password(&long[..BCRYPT_MAX_PASSWORD_BYTES], &hash) {
        report.pass("long passwords are hashed in full");
    } else {
        report.fail("long password verification returned the wrong answer");
    }

    Ok(())
}

fn check_tokens(report: &mut Report, secret: &TokenSecret) -> Result<()> {
    let issuer = TokenIssuer::new(secret);
    let token = issuer.issue_for(SAMPLE_USER, None)?;
    let claims = issuer.verify(&token)?;
    if claims.sub == SAMPLE_USER {
        report.pass("token issue and verify works");
    } else {
        report.fail(format!("token subject came back as {:?}", claims.sub));
    }
    Ok(())
}

async fn check_database(report: &mut Report) -> Result<()> {
    let pool = db::memory_pool().await?;
    if db::is_connected(&pool).await {
        report.pass("database connection and schema work");
    } else {
        report.fail("database did not answer");
    }
    pool.close().await;
    Ok(())
}

fn check_env_file(report: &mut Report, dir: &Path) {
    if dir.join(".env").exists() {
        report.warn(format!(
            ".env found in {}; make sure {SECRET_KEY_ENV} is changed for production",
            dir.display()
        ));
    } else {
        report.pass("no .env file present");
    }
}
