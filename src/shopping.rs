//! Offline product search behind `/search`: a fixed demo catalogue, a price
//! summary over it, and plain search links when nothing matched.

use crate::core::error::ChatError;
use reqwest::Url;
use std::fmt::Write;

pub const DEFAULT_MAX_RESULTS: usize = 5;
pub const MAX_RESULTS_LIMIT: usize = 20;
const BEST_DEALS: usize = 5;

#[derive(Debug, Clone, PartialEq)]
pub struct Listing {
    pub title: String,
    pub price: f64,
    pub platform: String,
    pub url: String,
    pub rating: Option<String>,
}

impl Listing {
    fn new(title: String, price: f64, platform: &str, url: String, rating: Option<&str>) -> Self {
        Self {
            title,
            price,
            platform: platform.to_string(),
            url,
            rating: rating.map(str::to_string),
        }
    }
}

/// A parsed `/search` request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub query: String,
    pub max_results: usize,
}

impl SearchRequest {
    /// Reads `words... [--max N]`. An unreadable `N` falls back to the
    /// default; any `N` is clamped to `1..=20`.
    pub fn parse(args: &[&str]) -> Result<Self, ChatError> {
        let mut words = Vec::new();
        let mut max_results = DEFAULT_MAX_RESULTS;

        let mut iter = args.iter();
        while let Some(&arg) = iter.next() {
            if arg == "--max" {
                max_results = iter
                    .next()
                    .and_then(|n| n.parse().ok())
                    .unwrap_or(DEFAULT_MAX_RESULTS);
            } else {
                words.push(arg);
            }
        }

        let query = words.join(" ");
        if query.trim().is_empty() {
            return Err(ChatError::Input(
                "Missing search query. Usage: /search <product> [--max N]".to_string(),
            ));
        }

        Ok(Self {
            query,
            max_results: max_results.clamp(1, MAX_RESULTS_LIMIT),
        })
    }
}

/// The demo catalogue: the same three offers for any query.
pub fn demo_listings(query: &str) -> Vec<Listing> {
    vec![
        Listing::new(
            format!("{} - Amazon Deal", query),
            1999.0,
            "Amazon",
            "https://www.amazon.in".to_string(),
            Some("4.2"),
        ),
        Listing::new(
            format!("{} - Flipkart Offer", query),
            2199.0,
            "Flipkart",
            "https://www.flipkart.com".to_string(),
            Some("4.0"),
        ),
        Listing::new(
            format!("{} - Croma Exclusive", query),
            2499.0,
            "Croma",
            "https://www.croma.com".to_string(),
            None,
        ),
    ]
}

/// Search pages on the big platforms, offered when no listing was found.
pub fn fallback_links(query: &str) -> Vec<Listing> {
    let link = |base: &str, param: &str| {
        Url::parse_with_params(base, &[(param, query)])
            .map(String::from)
            .unwrap_or_else(|_| base.to_string())
    };
    vec![
        Listing::new(
            format!("Search {} on Amazon", query),
            0.0,
            "Amazon",
            link("https://www.amazon.in/s", "k"),
            None,
        ),
        Listing::new(
            format!("Search {} on Flipkart", query),
            0.0,
            "Flipkart",
            link("https://www.flipkart.com/search", "q"),
            None,
        ),
    ]
}

/// Price statistics over the listings that carry a price.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceSummary {
    pub cheapest: Listing,
    pub average: f64,
    pub min: f64,
    pub max: f64,
    /// Cheapest first, at most five.
    pub best_deals: Vec<Listing>,
    pub platforms: Vec<String>,
}

impl PriceSummary {
    /// `None` when no listing has a positive price.
    pub fn analyze(listings: &[Listing]) -> Option<Self> {
        let mut priced: Vec<&Listing> = listings
            .iter()
            .filter(|l| l.price.is_finite() && l.price > 0.0)
            .collect();
        priced.sort_by(|a, b| a.price.total_cmp(&b.price));

        let cheapest = (*priced.first()?).clone();
        let max = priced.last().map_or(cheapest.price, |l| l.price);
        let average = priced.iter().map(|l| l.price).sum::<f64>() / priced.len() as f64;

        let mut platforms: Vec<String> = Vec::new();
        for listing in &priced {
            if !platforms.contains(&listing.platform) {
                platforms.push(listing.platform.clone());
            }
        }

        Some(Self {
            min: cheapest.price,
            max,
            average,
            best_deals: priced.iter().take(BEST_DEALS).map(|l| (*l).clone()).collect(),
            platforms,
            cheapest,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchReport {
    pub query: String,
    pub total_found: usize,
    pub results: Vec<Listing>,
    pub summary: Option<PriceSummary>,
    /// Set when `results` are search links rather than listings.
    pub fallback: bool,
}

impl SearchReport {
    pub fn build(request: &SearchRequest, listings: Vec<Listing>) -> Self {
        let total_found = listings.len();
        if listings.is_empty() {
            let mut links = fallback_links(&request.query);
            links.truncate(request.max_results);
            return Self {
                query: request.query.clone(),
                total_found,
                results: links,
                summary: None,
                fallback: true,
            };
        }

        let summary = PriceSummary::analyze(&listings);
        let mut results = match &summary {
            Some(summary) => summary.best_deals.clone(),
            None => listings,
        };
        results.truncate(request.max_results);

        Self {
            query: request.query.clone(),
            total_found,
            results,
            summary,
            fallback: false,
        }
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        if self.fallback {
            let _ = writeln!(out, "No listings found for \"{}\". Try these:", self.query);
            for link in &self.results {
                let _ = writeln!(out, "  {} {}", link.title, link.url);
            }
            return out.trim_end().to_string();
        }

        let _ = writeln!(
            out,
            "Results for \"{}\" (demo data, {} found)",
            self.query, self.total_found
        );
        if let Some(summary) = &self.summary {
            let best = &summary.cheapest;
            let _ = writeln!(
                out,
                "🏆 Best deal: {} ₹{:.2} - {}",
                best.platform, best.price, best.title
            );
            let _ = writeln!(out, "   {}", best.url);
            let _ = writeln!(
                out,
                "💰 Average ₹{:.2}, range ₹{:.2} - ₹{:.2} (difference ₹{:.2})",
                summary.average,
                summary.min,
                summary.max,
                summary.max - summary.min
            );
            let _ = writeln!(out, "   Platforms: {}", summary.platforms.join(", "));
        }
        for (i, listing) in self.results.iter().enumerate() {
            let rating = listing
                .rating
                .as_deref()
                .map(|r| format!(" ★{}", r))
                .unwrap_or_default();
            let _ = writeln!(
                out,
                "{}. {}: ₹{:.2}{} - {}",
                i + 1,
                listing.platform,
                listing.price,
                rating,
                listing.title
            );
        }
        out.trim_end().to_string()
    }
}
