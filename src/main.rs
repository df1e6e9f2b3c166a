// src/main.rs

//! # did-linkage - command-line driver
//!
//! Runs a bidirectional DID ↔ domain linkage check and prints each
//! direction's outcome.
//!
//! ```text
//! did-linkage <did> <domain>
//! ```
//!
//! ## Environment Variables
//! - `LINKAGE_RESOLVER_URL`: (Optional) DID resolver base URL
//! - `LINKAGE_REQUEST_TIMEOUT_SECS`: (Optional) HTTP timeout (default: 10)
//! - `LINKAGE_USER_AGENT`: (Optional) User-Agent header
//! - `RUST_LOG`: log filter for `env_logger`

use anyhow::{bail, Context};
use did_domain_linkage::{
    BidirectionalReport, DomainLinkageVerifier, HttpConfigurationFetcher, HttpDidResolver,
    JwsSignatureVerifier, LinkageError, Settings, VerifiedLinkage,
};
use dotenv::dotenv;
use std::process::ExitCode;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    // Load environment variables from .env file
    dotenv().ok();
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let [did, domain] = args.as_slice() else {
        bail!("usage: did-linkage <did> <domain>");
    };

    let settings = Settings::load().context("Failed to load settings")?;
    let http = settings.http_client().context("Failed to build HTTP client")?;
    let resolver = HttpDidResolver::new(http.clone(), &settings.resolver_url)
        .context("Invalid resolver URL")?;

    let verifier = DomainLinkageVerifier::new(
        Arc::new(resolver),
        Arc::new(HttpConfigurationFetcher::new(http)),
        Arc::new(JwsSignatureVerifier::new()),
    );

    let report = verifier.verify_bidirectional(did, domain).await;
    print_report(&report);

    Ok(if report.is_linked() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn print_report(report: &BidirectionalReport) {
    println!("DID:    {}", report.did);
    println!("Domain: {}", report.domain);
    println!("DID -> domain: {}", describe(&report.did_to_domain));
    println!("domain -> DID: {}", describe(&report.domain_to_did));
    println!(
        "Result: {}",
        if report.is_linked() { "LINKED" } else { "NOT LINKED" }
    );
}

fn describe(outcome: &Result<VerifiedLinkage, LinkageError>) -> String {
    match outcome {
        Ok(linkage) => format!("ok ({} <-> {})", linkage.issuer, linkage.domain),
        Err(LinkageError::NoLinkedDomainService(_)) => {
            "not configured (no LinkedDomains service)".to_string()
        }
        Err(e) => format!("failed: {}", e),
    }
}
