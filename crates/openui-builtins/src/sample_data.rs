//! `generate_sample_data`: random records drawn from fixed vocabularies.

use crate::args;
use async_trait::async_trait;
use chrono::{Duration, Utc};
use openui_core::{Arguments, DisplayType, ToolError, ToolResult};
use openui_tools::ToolHandler;
use rand::seq::SliceRandom;
use rand::Rng;
use serde_json::{json, Map, Value};

/// Record count used when `count` is missing, non-numeric or zero.
pub const DEFAULT_COUNT: usize = 10;
/// Upper bound on generated records.
pub const MAX_COUNT: usize = 1_000;

const FIRST_NAMES: &[&str] = &[
    "John", "Jane", "Bob", "Alice", "Charlie", "Diana", "Eve", "Frank", "Grace", "Henry",
];
const LAST_NAMES: &[&str] = &[
    "Smith",
    "Johnson",
    "Brown",
    "Wilson",
    "Davis",
    "Miller",
    "Garcia",
    "Rodriguez",
    "Martinez",
    "Anderson",
];
const ROLES: &[&str] = &["Admin", "User", "Editor", "Moderator", "Viewer"];
const PRODUCTS: &[&str] = &[
    "Laptop",
    "Phone",
    "Tablet",
    "Headphones",
    "Camera",
    "Watch",
    "Keyboard",
    "Mouse",
    "Monitor",
    "Speaker",
];
const BRANDS: &[&str] = &[
    "Apple",
    "Samsung",
    "Sony",
    "Microsoft",
    "Google",
    "Dell",
    "HP",
    "Lenovo",
    "Asus",
    "Acer",
];
const PRODUCT_CATEGORIES: &[&str] = &[
    "Electronics",
    "Computers",
    "Audio",
    "Mobile",
    "Gaming",
    "Accessories",
];
const POST_TITLES: &[&str] = &[
    "Getting Started with React",
    "Advanced TypeScript Tips",
    "Building Modern UIs",
    "Performance Optimization",
    "State Management Patterns",
    "API Integration Best Practices",
    "Testing Strategies",
    "Deployment and DevOps",
    "Security Considerations",
    "Future of Web Development",
];
const POST_TAGS: &[&str] = &["JavaScript", "React", "TypeScript", "CSS", "HTML"];
const TRAFFIC_SOURCES: &[&str] = &["organic", "direct", "social", "referral", "email"];
const DEVICES: &[&str] = &["desktop", "mobile", "tablet"];
const COMPANIES: &[&str] = &[
    "TechCorp",
    "InnovateCo",
    "FutureWorks",
    "DataSystems",
    "CloudFirst",
    "MobileNext",
    "AIAdvanced",
    "WebSolutions",
    "DevTools",
    "CodeCraft",
];
const INDUSTRIES: &[&str] = &[
    "Technology",
    "Healthcare",
    "Finance",
    "Education",
    "Retail",
    "Manufacturing",
    "Media",
    "Transportation",
];
const HEADQUARTERS: &[&str] = &[
    "New York",
    "San Francisco",
    "London",
    "Berlin",
    "Tokyo",
    "Toronto",
];
const EVENT_KINDS: &[&str] = &[
    "Conference",
    "Workshop",
    "Webinar",
    "Meetup",
    "Hackathon",
    "Training",
    "Seminar",
    "Presentation",
];
const EVENT_TOPICS: &[&str] = &[
    "JavaScript",
    "Python",
    "Design",
    "Marketing",
    "AI/ML",
    "DevOps",
    "Security",
    "Mobile",
];
const EVENT_LOCATIONS: &[&str] = &[
    "Online",
    "New York",
    "San Francisco",
    "London",
    "Berlin",
    "Toronto",
];

/// Supported record families.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataType {
    /// People with contact details.
    Users,
    /// Catalog items with prices.
    Products,
    /// Blog posts.
    Posts,
    /// Dated traffic figures.
    Analytics,
    /// Businesses.
    Companies,
    /// Scheduled events.
    Events,
}

impl DataType {
    /// Case-insensitive; unknown names fall back to [`DataType::Users`].
    pub fn parse(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "products" => Self::Products,
            "posts" => Self::Posts,
            "analytics" => Self::Analytics,
            "companies" => Self::Companies,
            "events" => Self::Events,
            _ => Self::Users,
        }
    }
}

/// Reads `count` like `parseInt(count) || 10`; negatives produce nothing.
pub fn parse_count(raw: Option<&str>) -> usize {
    match raw.and_then(args::leading_int) {
        None | Some(0) => DEFAULT_COUNT,
        Some(n) if n < 0 => 0,
        Some(n) => usize::try_from(n).unwrap_or(MAX_COUNT).min(MAX_COUNT),
    }
}

fn pick<'a, R: Rng>(rng: &mut R, items: &[&'a str]) -> &'a str {
    items.choose(rng).copied().unwrap_or_default()
}

fn date_days_from_now<R: Rng>(rng: &mut R, max_days: i64, forward: bool) -> String {
    let offset = Duration::seconds(rng.gen_range(0..max_days * 24 * 60 * 60));
    let now = Utc::now();
    let date = if forward { now + offset } else { now - offset };
    date.format("%Y-%m-%d").to_string()
}

fn record<R: Rng>(rng: &mut R, kind: DataType, position: usize) -> Value {
    let id = position + 1;
    match kind {
        DataType::Users => {
            let first = pick(rng, FIRST_NAMES);
            let last = pick(rng, LAST_NAMES);
            json!({
                "id": id,
                "name": format!("{first} {last}"),
                "email": format!("{}.{}@example.com", first.to_lowercase(), last.to_lowercase()),
                "role": pick(rng, ROLES),
                "age": rng.gen_range(18..68),
                "joinDate": date_days_from_now(rng, 365, false),
                "isActive": rng.gen_bool(0.7),
            })
        }
        DataType::Products => json!({
            "id": id,
            "name": format!("{} {}", pick(rng, BRANDS), pick(rng, PRODUCTS)),
            "category": pick(rng, PRODUCT_CATEGORIES),
            "price": rng.gen_range(50..2050),
            "stock": rng.gen_range(0..100),
            "rating": f64::from(rng.gen_range(0..50u8)) / 10.0,
            "inStock": rng.gen_bool(0.8),
            "description": format!(
                "High-quality {} with excellent features.",
                pick(rng, PRODUCTS).to_lowercase()
            ),
        }),
        DataType::Posts => {
            let tag_count = rng.gen_range(1..=3);
            json!({
                "id": id,
                "title": pick(rng, POST_TITLES),
                "author": format!("Author {id}"),
                "content": format!(
                    "This is a sample post content for post {id}. Lorem ipsum dolor sit amet, consectetur adipiscing elit."
                ),
                "publishDate": date_days_from_now(rng, 365, false),
                "views": rng.gen_range(0..10_000),
                "likes": rng.gen_range(0..500),
                "comments": rng.gen_range(0..100),
                "tags": &POST_TAGS[..tag_count],
                "published": rng.gen_bool(0.9),
            })
        }
        DataType::Analytics => {
            let date = (Utc::now() - Duration::days(position as i64))
                .format("%Y-%m-%d")
                .to_string();
            json!({
                "id": id,
                "date": date,
                "pageviews": rng.gen_range(1_000..11_000),
                "sessions": rng.gen_range(500..5_500),
                "users": rng.gen_range(300..3_300),
                "bounceRate": rng.gen_range(20..100),
                "avgSessionDuration": rng.gen_range(60..360),
                "source": pick(rng, TRAFFIC_SOURCES),
                "device": pick(rng, DEVICES),
            })
        }
        DataType::Companies => json!({
            "id": id,
            "name": pick(rng, COMPANIES),
            "industry": pick(rng, INDUSTRIES),
            "employees": rng.gen_range(10..10_010),
            "revenue": rng.gen_range(1_000_000u64..1_001_000_000),
            "founded": rng.gen_range(1974..2024),
            "headquarters": pick(rng, HEADQUARTERS),
            "isPublic": rng.gen_bool(0.5),
            "website": format!("https://www.{}.com", pick(rng, COMPANIES).to_lowercase()),
        }),
        DataType::Events => {
            let topic = pick(rng, EVENT_TOPICS);
            let kind_name = pick(rng, EVENT_KINDS);
            json!({
                "id": id,
                "name": format!("{topic} {kind_name}"),
                "date": date_days_from_now(rng, 365, true),
                "location": pick(rng, EVENT_LOCATIONS),
                "attendees": rng.gen_range(10..1_010),
                "maxCapacity": rng.gen_range(50..550),
                "price": rng.gen_range(0..500),
                "organizer": format!("{} Org", pick(rng, EVENT_KINDS)),
                "description": format!(
                    "Learn about {} in this comprehensive {}.",
                    pick(rng, EVENT_TOPICS),
                    pick(rng, EVENT_KINDS).to_lowercase()
                ),
                "isVirtual": rng.gen_bool(0.6),
            })
        }
    }
}

/// Keeps only the requested keys that exist on the record.
fn project(record: Value, fields: &[String]) -> Value {
    let Value::Object(mut full) = record else {
        return record;
    };
    let mut out = Map::new();
    for field in fields {
        if let Some(value) = full.remove(field) {
            out.insert(field.clone(), value);
        }
    }
    Value::Object(out)
}

/// Generates `count` records of `kind`, projected onto `fields` if given.
pub fn generate<R: Rng>(
    rng: &mut R,
    kind: DataType,
    count: usize,
    fields: Option<&[String]>,
) -> Vec<Value> {
    (0..count)
        .map(|i| {
            let rec = record(rng, kind, i);
            match fields {
                Some(f) => project(rec, f),
                None => rec,
            }
        })
        .collect()
}

/// Handler for `generate_sample_data`.
pub struct SampleDataTool;

impl SampleDataTool {
    /// Generator seeded from the thread RNG.
    pub fn new() -> Self {
        Self
    }
}

impl Default for SampleDataTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ToolHandler for SampleDataTool {
    async fn call(&self, args: Arguments) -> Result<ToolResult, ToolError> {
        let kind = DataType::parse(&args::text(&args, "dataType").unwrap_or_default());
        let count = parse_count(args::text(&args, "count").as_deref());
        let fields = args::text(&args, "fields")
            .filter(|f| !f.is_empty())
            .map(|f| args::comma_list(&f));

        let records = generate(&mut rand::thread_rng(), kind, count, fields.as_deref());
        Ok(ToolResult::success(Value::from(records), DisplayType::Json))
    }
}
