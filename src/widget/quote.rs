use std::time::Duration;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::storage::Storage;
use crate::widget::{Fetched, RateLimiter};

const DAILY_QUOTE_KEY: &str = "dailyQuote";
const LAST_QUOTE_FETCH_KEY: &str = "lastQuoteFetch";

const REQUEST_LIMIT: u32 = 5;
const REQUEST_WINDOW: Duration = Duration::from_secs(60);

/// Static table of last-resort quotes; one is chosen uniformly at random
/// when every provider fails or the request budget is spent.
pub const FALLBACK_QUOTES: &[(&str, &str)] = &[
    (
        "The greatest glory in living lies not in never falling, but in rising every time we fall.",
        "Nelson Mandela",
    ),
    (
        "The way to get started is to quit talking and begin doing.",
        "Walt Disney",
    ),
    (
        "Your time is limited, so don't waste it living someone else's life.",
        "Steve Jobs",
    ),
    (
        "If life were predictable it would cease to be life, and be without flavor.",
        "Eleanor Roosevelt",
    ),
    (
        "If you look at what you have in life, you'll always have more.",
        "Oprah Winfrey",
    ),
    (
        "Life is what happens when you're busy making other plans.",
        "John Lennon",
    ),
    (
        "The future belongs to those who believe in the beauty of their dreams.",
        "Eleanor Roosevelt",
    ),
    (
        "It is during our darkest moments that we must focus to see the light.",
        "Aristotle",
    ),
    ("Whoever is happy will make others happy too.", "Anne Frank"),
    (
        "Do not go where the path may lead, go instead where there is no path and leave a trail.",
        "Ralph Waldo Emerson",
    ),
    (
        "Success is not final, failure is not fatal: it is the courage to continue that counts.",
        "Winston Churchill",
    ),
    (
        "The only impossible journey is the one you never begin.",
        "Tony Robbins",
    ),
    (
        "In the middle of difficulty lies opportunity.",
        "Albert Einstein",
    ),
    (
        "Believe you can and you're halfway there.",
        "Theodore Roosevelt",
    ),
    (
        "The only way to do great work is to love what you do.",
        "Steve Jobs",
    ),
    (
        "Innovation distinguishes between a leader and a follower.",
        "Steve Jobs",
    ),
    ("Stay hungry, stay foolish.", "Steve Jobs"),
    (
        "The best time to plant a tree was 20 years ago. The second best time is now.",
        "Chinese Proverb",
    ),
    (
        "Don't watch the clock; do what it does. Keep going.",
        "Sam Levenson",
    ),
    (
        "Everything you've ever wanted is on the other side of fear.",
        "George Addair",
    ),
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub content: String,
    pub author: String,
    pub fetched: NaiveDateTime,
}

impl Quote {
    fn new(content: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            author: author.into(),
            fetched: chrono::Local::now().naive_local(),
        }
    }
}

/// One quote source. Provider responses differ in shape and are normalized
/// to `Quote` on receipt.
#[async_trait]
pub trait QuoteProvider: Send + Sync {
    fn name(&self) -> &'static str;
    async fn fetch(&self, client: &reqwest::Client) -> Result<Quote, String>;
}

/// ZenQuotes: returns a one-element array of `{"q": .., "a": ..}`.
pub struct ZenQuotes;

#[async_trait]
impl QuoteProvider for ZenQuotes {
    fn name(&self) -> &'static str {
        "zenquotes"
    }

    async fn fetch(&self, client: &reqwest::Client) -> Result<Quote, String> {
        let resp = client
            .get("https://zenquotes.io/api/random")
            .send()
            .await
            .map_err(|e| format!("Request failed: {}", e))?;
        if !resp.status().is_success() {
            return Err(format!("HTTP {}", resp.status()));
        }
        let body: serde_json::Value = resp
            .json()
            .await
            .map_err(|e| format!("Failed to parse response: {}", e))?;
        let first = body
            .as_array()
            .and_then(|arr| arr.first())
            .ok_or_else(|| "Empty response".to_string())?;
        match (first["q"].as_str(), first["a"].as_str()) {
            (Some(content), Some(author)) => Ok(Quote::new(content, author)),
            _ => Err("Response missing quote fields".to_string()),
        }
    }
}

/// Quotable: returns `{"content": .., "author": ..}`.
pub struct Quotable;

#[async_trait]
impl QuoteProvider for Quotable {
    fn name(&self) -> &'static str {
        "quotable"
    }

    async fn fetch(&self, client: &reqwest::Client) -> Result<Quote, String> {
        let resp = client
            .get("https://api.quotable.io/random")
            .send()
            .await
            .map_err(|e| format!("Request failed: {}", e))?;
        if !resp.status().is_success() {
            return Err(format!("HTTP {}", resp.status()));
        }
        let body: serde_json::Value = resp
            .json()
            .await
            .map_err(|e| format!("Failed to parse response: {}", e))?;
        match (body["content"].as_str(), body["author"].as_str()) {
            (Some(content), Some(author)) => Ok(Quote::new(content, author)),
            _ => Err("Response missing quote fields".to_string()),
        }
    }
}

/// Daily-quote widget: an ordered provider chain with a static terminal
/// fallback, a per-day cache, and a fixed-window request budget.
pub struct QuoteWidget {
    storage: Storage,
    client: reqwest::Client,
    providers: Vec<Box<dyn QuoteProvider>>,
    limiter: RateLimiter,
}

impl QuoteWidget {
    pub fn new(storage: Storage) -> Self {
        Self::with_providers(storage, vec![Box::new(ZenQuotes), Box::new(Quotable)])
    }

    pub fn with_providers(storage: Storage, providers: Vec<Box<dyn QuoteProvider>>) -> Self {
        Self {
            storage,
            client: reqwest::Client::new(),
            providers,
            limiter: RateLimiter::new(REQUEST_LIMIT, REQUEST_WINDOW),
        }
    }

    /// The quote for `today`: the cached quote if it was fetched today,
    /// otherwise a fresh fetch.
    pub async fn current(&mut self, today: NaiveDate) -> Fetched<Quote> {
        if let Some(quote) = self.cached_for(today) {
            return Fetched::from_cache(quote);
        }
        self.refresh(today).await
    }

    /// Walk the provider chain and cache the result for the rest of the day.
    /// A spent request budget serves the cache or a fallback quote without
    /// touching the network.
    pub async fn refresh(&mut self, today: NaiveDate) -> Fetched<Quote> {
        if !self.limiter.try_acquire() {
            log::info!("Quote request budget spent; serving without a fetch");
            return match self.storage.get::<Quote>(DAILY_QUOTE_KEY) {
                Some(quote) => Fetched::from_cache(quote),
                None => Fetched::from_fallback(random_fallback()),
            };
        }

        for provider in &self.providers {
            match provider.fetch(&self.client).await {
                Ok(quote) => {
                    self.cache(&quote, today);
                    return Fetched::from_provider(quote, provider.name());
                }
                Err(e) => log::info!("Quote provider {} failed: {}", provider.name(), e),
            }
        }

        let quote = random_fallback();
        self.cache(&quote, today);
        Fetched::from_fallback(quote)
    }

    fn cached_for(&self, today: NaiveDate) -> Option<Quote> {
        let last_fetch: String = self.storage.get(LAST_QUOTE_FETCH_KEY)?;
        if last_fetch != today.to_string() {
            return None;
        }
        self.storage.get(DAILY_QUOTE_KEY)
    }

    fn cache(&self, quote: &Quote, today: NaiveDate) {
        self.storage.set(DAILY_QUOTE_KEY, quote);
        self.storage.set(LAST_QUOTE_FETCH_KEY, &today.to_string());
    }
}

/// A uniformly random member of the fallback table.
pub fn random_fallback() -> Quote {
    let index = rand::thread_rng().gen_range(0..FALLBACK_QUOTES.len());
    let (content, author) = FALLBACK_QUOTES[index];
    Quote::new(content, author)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widget::DataSource;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FakeProvider {
        name: &'static str,
        result: Result<(&'static str, &'static str), &'static str>,
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl QuoteProvider for FakeProvider {
        fn name(&self) -> &'static str {
            self.name
        }

        async fn fetch(&self, _client: &reqwest::Client) -> Result<Quote, String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.result {
                Ok((content, author)) => Ok(Quote::new(content, author)),
                Err(e) => Err(e.to_string()),
            }
        }
    }

    fn fake(
        name: &'static str,
        result: Result<(&'static str, &'static str), &'static str>,
    ) -> (Box<dyn QuoteProvider>, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let provider = FakeProvider {
            name,
            result,
            calls: calls.clone(),
        };
        (Box::new(provider), calls)
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
    }

    fn is_fallback(quote: &Quote) -> bool {
        FALLBACK_QUOTES
            .iter()
            .any(|(content, author)| quote.content == *content && quote.author == *author)
    }

    #[tokio::test]
    async fn first_successful_provider_wins() {
        let dir = tempfile::tempdir().unwrap();
        let (primary, primary_calls) = fake("primary", Ok(("Per aspera", "Seneca")));
        let (secondary, secondary_calls) = fake("secondary", Ok(("unused", "nobody")));
        let mut widget =
            QuoteWidget::with_providers(Storage::new(dir.path()), vec![primary, secondary]);

        let fetched = widget.refresh(today()).await;
        assert_eq!(fetched.source, DataSource::Provider("primary"));
        assert_eq!(fetched.value.content, "Per aspera");
        assert_eq!(primary_calls.load(Ordering::SeqCst), 1);
        assert_eq!(secondary_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn failed_primary_falls_through_to_secondary() {
        let dir = tempfile::tempdir().unwrap();
        let (primary, _) = fake("primary", Err("boom"));
        let (secondary, _) = fake("secondary", Ok(("Audentes fortuna iuvat", "Virgil")));
        let mut widget =
            QuoteWidget::with_providers(Storage::new(dir.path()), vec![primary, secondary]);

        let fetched = widget.refresh(today()).await;
        assert_eq!(fetched.source, DataSource::Provider("secondary"));
        assert_eq!(fetched.value.author, "Virgil");
    }

    #[tokio::test]
    async fn all_providers_failing_serves_a_fallback_quote() {
        let dir = tempfile::tempdir().unwrap();
        let (primary, _) = fake("primary", Err("down"));
        let (secondary, _) = fake("secondary", Err("also down"));
        let mut widget =
            QuoteWidget::with_providers(Storage::new(dir.path()), vec![primary, secondary]);

        let fetched = widget.refresh(today()).await;
        assert_eq!(fetched.source, DataSource::Fallback);
        assert!(is_fallback(&fetched.value));
    }

    #[tokio::test]
    async fn same_day_cache_skips_the_provider_chain() {
        let dir = tempfile::tempdir().unwrap();
        let (provider, calls) = fake("primary", Ok(("Carpe diem", "Horace")));
        let mut widget = QuoteWidget::with_providers(Storage::new(dir.path()), vec![provider]);

        let first = widget.current(today()).await;
        assert_eq!(first.source, DataSource::Provider("primary"));
        let second = widget.current(today()).await;
        assert_eq!(second.source, DataSource::Cache);
        assert_eq!(second.value, first.value);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn stale_cache_triggers_a_new_fetch() {
        let dir = tempfile::tempdir().unwrap();
        let (provider, calls) = fake("primary", Ok(("Carpe diem", "Horace")));
        let mut widget = QuoteWidget::with_providers(Storage::new(dir.path()), vec![provider]);

        widget.current(today()).await;
        let tomorrow = today().succ_opt().unwrap();
        let fetched = widget.current(tomorrow).await;
        assert_eq!(fetched.source, DataSource::Provider("primary"));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn spent_budget_makes_no_network_attempt() {
        let dir = tempfile::tempdir().unwrap();
        let (provider, calls) = fake("primary", Ok(("Festina lente", "Augustus")));
        let mut widget = QuoteWidget::with_providers(Storage::new(dir.path()), vec![provider]);

        for _ in 0..5 {
            widget.refresh(today()).await;
        }
        assert_eq!(calls.load(Ordering::SeqCst), 5);

        let fetched = widget.refresh(today()).await;
        assert_eq!(calls.load(Ordering::SeqCst), 5);
        assert_eq!(fetched.source, DataSource::Cache);
        assert_eq!(fetched.value.content, "Festina lente");
    }

    #[tokio::test]
    async fn spent_budget_without_cache_serves_a_fallback() {
        let dir = tempfile::tempdir().unwrap();
        let (provider, calls) = fake("primary", Err("down"));
        let mut widget = QuoteWidget::with_providers(Storage::new(dir.path()), vec![provider]);
        // Exhaust the budget, then clear the cache the fallbacks left behind.
        for _ in 0..5 {
            widget.refresh(today()).await;
        }
        widget.storage.remove(DAILY_QUOTE_KEY);

        let fetched = widget.refresh(today()).await;
        assert_eq!(calls.load(Ordering::SeqCst), 5);
        assert_eq!(fetched.source, DataSource::Fallback);
        assert!(is_fallback(&fetched.value));
    }
}
