use serde::{Deserialize, Serialize};

use super::{ratio, sort_by_label, sort_by_metric, DashboardRow, MetricBuilder, SortDirection};
use crate::format::{format_currency, format_number, format_percent, FormatterCache};
use crate::synth::{jitter, Domain, RangeParams};

// (sku, name, unit price, unit cost)
const CATALOG: [(&str, &str, f64, f64); 8] = [
    ("SKU-1001", "Espresso Grinder", 899.0, 540.0),
    ("SKU-1002", "Pour-Over Kettle", 249.0, 118.0),
    ("SKU-1003", "Ceramic Dripper", 119.0, 41.0),
    ("SKU-1004", "Cold Brew Jar", 159.0, 72.0),
    ("SKU-1005", "Milk Frother", 329.0, 205.0),
    ("SKU-1006", "Paper Filters 200", 29.0, 9.0),
    ("SKU-1007", "Travel Mug", 89.0, 38.0),
    ("SKU-1008", "Digital Scale", 189.0, 97.0),
];

pub const DEFAULT_ROWS: usize = CATALOG.len();

const BASE_UNITS: f64 = 420.0;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProductMargin {
    pub sku: String,
    pub product: String,
    pub units: f64,
    pub revenue: f64,
    pub cost: f64,
    pub profit: f64,
    pub margin: f64,
}

impl ProductMargin {
    pub fn from_base(sku: String, product: String, units: f64, revenue: f64, cost: f64) -> Self {
        let profit = revenue - cost;
        Self {
            sku,
            product,
            units,
            revenue,
            cost,
            profit,
            margin: ratio(profit, revenue),
        }
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct ProductBuilder;

impl MetricBuilder for ProductBuilder {
    type Record = ProductMargin;

    const DOMAIN: Domain = Domain::Products;
    const TABLE: &'static str = "products";

    fn from_row(&self, index: usize, row: &DashboardRow) -> ProductMargin {
        let sku = row.dimension("sku", &format!("SKU-{}", index + 1));
        let product = row.dimension("product", &sku);
        ProductMargin::from_base(
            sku,
            product,
            row.metric("units", 0.0),
            row.metric("revenue", 0.0),
            row.metric("cost", 0.0),
        )
    }

    fn synthesize(&self, index: usize, params: RangeParams) -> ProductMargin {
        let RangeParams { multiplier, seed } = params;
        let (sku, name, price, unit_cost) = CATALOG[index % CATALOG.len()];
        let (sku, product) = match index / CATALOG.len() {
            0 => (sku.to_string(), name.to_string()),
            round => (format!("{sku}-{round}"), format!("{name} ({})", round + 1)),
        };

        let units = (BASE_UNITS * multiplier * (1.0 + jitter(index, seed, 0, 0.4))).round();
        let revenue = units * price * (1.0 + jitter(index, seed, 4, 0.08));
        let cost = units * unit_cost * (1.0 + jitter(index, seed, 8, 0.1));

        ProductMargin::from_base(sku, product, units, revenue, cost)
    }

    fn headline(&self, record: &ProductMargin) -> f64 {
        record.profit
    }

    fn render(
        &self,
        record: &ProductMargin,
        cache: &FormatterCache,
        locale: &str,
    ) -> Vec<(&'static str, String)> {
        vec![
            ("sku", record.sku.clone()),
            ("product", record.product.clone()),
            ("units", format_number(cache, record.units, locale)),
            ("revenue", format_currency(cache, record.revenue, locale)),
            ("profit", format_currency(cache, record.profit, locale)),
            ("margin", format_percent(cache, record.margin, locale)),
        ]
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ProductSort {
    Product,
    Units,
    Revenue,
    Profit,
    Margin,
}

pub fn sort_products(records: &mut [ProductMargin], by: ProductSort, direction: SortDirection) {
    match by {
        ProductSort::Product => sort_by_label(records, direction, |r| r.product.as_str()),
        ProductSort::Units => sort_by_metric(records, direction, |r| r.units),
        ProductSort::Revenue => sort_by_metric(records, direction, |r| r.revenue),
        ProductSort::Profit => sort_by_metric(records, direction, |r| r.profit),
        ProductSort::Margin => sort_by_metric(records, direction, |r| r.margin),
    }
}
