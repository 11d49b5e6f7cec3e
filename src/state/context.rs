use crate::config::CrawlConfig;
use crate::url::authority;
use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};
use url::Url;

/// Outcome of an admission attempt against the crawl's configured caps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdmissionOutcome {
    /// The URL was inserted into the seen-set and counted
    Admitted,

    /// The URL was already admitted earlier in this crawl
    AlreadySeen,

    /// Admitting would exceed `max_pages_to_crawl`
    PageCapReached { limit: u64 },

    /// Admitting would exceed `max_pages_to_crawl_per_domain`
    DomainCapReached { limit: u64, authority: String },
}

/// Per-crawl shared state.
///
/// The root URL, configuration and start instant are written once at crawl
/// start and only read afterwards. The seen-set and the per-domain counters
/// are the only fields workers mutate, and every mutation happens inside
/// `try_admit` under one lock, so an admission is a single serialized step.
#[derive(Debug)]
pub struct CrawlContext {
    /// Root URL of the crawl (the seed)
    pub root_url: Url,

    /// Immutable crawl configuration
    pub config: CrawlConfig,

    /// Monotonic instant the crawl started, set when the seed is enqueued
    pub started_at: Instant,

    admissions: Mutex<AdmissionLedger>,
}

#[derive(Debug, Default)]
struct AdmissionLedger {
    /// URLs admitted so far; basis for duplicate suppression. Its size is
    /// the admitted-page count.
    seen: HashSet<String>,

    /// Admitted-page count per authority
    per_domain: HashMap<String, u64>,
}

impl CrawlContext {
    /// Creates the context for a fresh crawl starting now.
    pub fn new(root_url: Url, config: CrawlConfig) -> Self {
        Self::with_started_at(root_url, config, Instant::now())
    }

    /// Creates a context with an explicit start instant.
    pub fn with_started_at(root_url: Url, config: CrawlConfig, started_at: Instant) -> Self {
        Self {
            root_url,
            config,
            started_at,
            admissions: Mutex::new(AdmissionLedger::default()),
        }
    }

    /// Wall-clock time elapsed since the crawl started, on the monotonic
    /// clock.
    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }

    /// Number of pages admitted so far.
    pub fn pages_crawled(&self) -> u64 {
        self.ledger().seen.len() as u64
    }

    /// True when the URL has already been admitted in this crawl.
    pub fn is_seen(&self, url: &Url) -> bool {
        self.ledger().seen.contains(url.as_str())
    }

    /// Admitted-page count for an authority.
    pub fn domain_count(&self, authority: &str) -> u64 {
        self.ledger().per_domain.get(authority).copied().unwrap_or(0)
    }

    /// Attempts to admit a page: duplicate check, page cap, per-domain cap,
    /// then the seen-set insert and counter bumps.
    ///
    /// The whole attempt runs under one lock, so it is an atomic
    /// check-and-increment: two workers racing on the same URL, or on two
    /// different URLs of one host with a single per-domain slot left, cannot
    /// both win. The caps have no zero-means-unlimited sentinel here; a cap
    /// of zero admits nothing.
    pub fn try_admit(&self, url: &Url) -> AdmissionOutcome {
        let mut ledger = self.ledger();

        if ledger.seen.contains(url.as_str()) {
            return AdmissionOutcome::AlreadySeen;
        }

        let page_limit = self.config.max_pages_to_crawl;
        if ledger.seen.len() as u64 + 1 > page_limit {
            return AdmissionOutcome::PageCapReached { limit: page_limit };
        }

        let auth = authority(url);
        if let Some(auth) = &auth {
            let domain_limit = self.config.max_pages_to_crawl_per_domain;
            let crawled = ledger.per_domain.get(auth).copied().unwrap_or(0);
            if crawled >= domain_limit {
                return AdmissionOutcome::DomainCapReached {
                    limit: domain_limit,
                    authority: auth.clone(),
                };
            }
        }

        ledger.seen.insert(url.as_str().to_string());
        if let Some(auth) = auth {
            *ledger.per_domain.entry(auth).or_insert(0) += 1;
        }
        AdmissionOutcome::Admitted
    }

    fn ledger(&self) -> std::sync::MutexGuard<'_, AdmissionLedger> {
        // A worker panicking mid-admission leaves the ledger consistent, so
        // keep going instead of propagating the poison.
        self.admissions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
