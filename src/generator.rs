//! Synthetic sales data.
//!
//! Produces a reproducible record set for demos and tests: five product
//! categories with their own price ranges and margins, a fixed customer
//! pool, and seasonal boosts for the holidays and for summer sports and
//! clothing.

use crate::records::TransactionRecord;
use chrono::{Datelike, Days, NaiveDate, Utc};
use log::{debug, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub const DEFAULT_SEED: u64 = 42;
pub const DEFAULT_RECORDS: usize = 5000;
pub const DEFAULT_SPAN_DAYS: u64 = 730;
pub const DEFAULT_CUSTOMERS: usize = 1000;

/// One product category and how it sells
struct CategoryProfile {
    name: &'static str,
    products: [&'static str; 5],
    price_range: (f64, f64),
    margin: f64,
    summer_boost: bool,
}

static CATALOG: [CategoryProfile; 5] = [
    CategoryProfile {
        name: "Electronics",
        products: ["Laptop", "Smartphone", "Tablet", "Headphones", "Smart Watch"],
        price_range: (200.0, 2000.0),
        margin: 0.15,
        summer_boost: false,
    },
    CategoryProfile {
        name: "Clothing",
        products: ["T-Shirt", "Jeans", "Dress", "Jacket", "Shoes"],
        price_range: (20.0, 200.0),
        margin: 0.40,
        summer_boost: true,
    },
    CategoryProfile {
        name: "Home & Garden",
        products: ["Sofa", "Table", "Chair", "Lamp", "Plant"],
        price_range: (50.0, 1000.0),
        margin: 0.25,
        summer_boost: false,
    },
    CategoryProfile {
        name: "Books",
        products: ["Fiction Novel", "Textbook", "Cookbook", "Biography", "Self-Help"],
        price_range: (10.0, 50.0),
        margin: 0.20,
        summer_boost: false,
    },
    CategoryProfile {
        name: "Sports",
        products: ["Basketball", "Tennis Racket", "Running Shoes", "Yoga Mat", "Bicycle"],
        price_range: (30.0, 500.0),
        margin: 0.30,
        summer_boost: true,
    },
];

const REGIONS: [&str; 5] = ["North", "South", "East", "West", "Central"];
const SEGMENTS: [&str; 3] = ["Consumer", "Corporate", "Home Office"];

/// `(quantity, weight)`
const QUANTITY_WEIGHTS: [(u32, u32); 5] = [(1, 50), (2, 25), (3, 15), (4, 7), (5, 3)];

/// `(discount percent, weight)`
const DISCOUNT_WEIGHTS: [(u32, u32); 7] = [
    (0, 60),
    (5, 15),
    (10, 10),
    (15, 8),
    (20, 4),
    (25, 2),
    (30, 1),
];

/// Generator configuration
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    pub records: usize,
    pub seed: u64,

    /// Last possible sale date
    pub end_date: NaiveDate,

    /// Days covered before `end_date`
    pub span_days: u64,

    /// Size of the `CUST_00001..` pool
    pub customers: usize,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            records: DEFAULT_RECORDS,
            seed: DEFAULT_SEED,
            end_date: Utc::now().date_naive(),
            span_days: DEFAULT_SPAN_DAYS,
            customers: DEFAULT_CUSTOMERS,
        }
    }
}

impl GeneratorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(mut self, records: usize) -> Self {
        self.records = records;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_end_date(mut self, end_date: NaiveDate) -> Self {
        self.end_date = end_date;
        self
    }

    /// First possible sale date
    pub fn start_date(&self) -> NaiveDate {
        self.end_date
            .checked_sub_days(Days::new(self.span_days))
            .unwrap_or(NaiveDate::MIN)
    }
}

/// Generate synthetic sales records
///
/// **Public** - main entry point for sample data
///
/// # Returns
/// `config.records` records sorted by date. The same config always yields
/// the same records.
pub fn generate_sales_data(config: &GeneratorConfig) -> Vec<TransactionRecord> {
    info!(
        "Generating {} records (seed {}) between {} and {}",
        config.records,
        config.seed,
        config.start_date(),
        config.end_date
    );

    let mut rng = StdRng::seed_from_u64(config.seed);
    let start = config.start_date();
    let span = (config.end_date - start).num_days().max(0) as u64;
    let customers = config.customers.max(1);

    let mut records: Vec<TransactionRecord> = (0..config.records)
        .map(|_| generate_record(&mut rng, start, span, customers))
        .collect();

    // Stable sort keeps generation order within a day
    records.sort_by_key(|r| r.date);

    debug!(
        "Generated {} records, first {:?}, last {:?}",
        records.len(),
        records.first().map(|r| r.date),
        records.last().map(|r| r.date)
    );

    records
}

/// Draw one record
///
/// **Private** - internal helper for generate_sales_data
fn generate_record(rng: &mut StdRng, start: NaiveDate, span: u64, customers: usize) -> TransactionRecord {
    let date = start
        .checked_add_days(Days::new(rng.gen_range(0..=span)))
        .unwrap_or(start);

    let category = &CATALOG[rng.gen_range(0..CATALOG.len())];
    let product = category.products[rng.gen_range(0..category.products.len())];
    let region = REGIONS[rng.gen_range(0..REGIONS.len())];
    let segment = SEGMENTS[rng.gen_range(0..SEGMENTS.len())];
    let customer_id = format!("CUST_{:05}", rng.gen_range(1..=customers));

    let (min_price, max_price) = category.price_range;
    let base_price = rng.gen_range(min_price..max_price);
    let quantity = weighted_pick(rng, &QUANTITY_WEIGHTS);
    let discount_percent = weighted_pick(rng, &DISCOUNT_WEIGHTS);

    let mut sales = base_price * f64::from(quantity) * (1.0 - f64::from(discount_percent) / 100.0);
    let mut profit = sales * category.margin * rng.gen_range(0.8..1.2);

    match date.month() {
        11 | 12 => {
            sales *= rng.gen_range(1.1..1.3);
            profit *= rng.gen_range(1.1..1.3);
        }
        6..=8 if category.summer_boost => {
            sales *= rng.gen_range(1.05..1.15);
            profit *= rng.gen_range(1.05..1.15);
        }
        _ => {}
    }

    TransactionRecord {
        date,
        product: product.to_string(),
        category: category.name.to_string(),
        region: region.to_string(),
        sales_amount: round2(sales),
        quantity,
        customer_id,
        customer_segment: segment.to_string(),
        discount: f64::from(discount_percent) / 100.0,
        profit: round2(profit),
    }
}

/// Roll against integer weights
fn weighted_pick(rng: &mut StdRng, table: &[(u32, u32)]) -> u32 {
    let total: u32 = table.iter().map(|(_, w)| w).sum();
    let mut roll = rng.gen_range(0..total);

    for (value, weight) in table {
        if roll < *weight {
            return *value;
        }
        roll -= weight;
    }

    // Unreachable with a positive total
    table.last().map(|(v, _)| *v).unwrap_or_default()
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
