//! Shared fixtures for API integration tests

use std::net::SocketAddr;

use climate_analyzer::app;
use climate_analyzer::data::model::{Cell, Column, Table};
use climate_analyzer::query::QueryService;
use climate_analyzer::state::AppState;
use tokio::net::TcpListener;

#[allow(dead_code)] // not every test binary uses it
pub fn s(v: &str) -> Cell {
    Cell::String(v.to_string())
}

/// The three-row `country, likelihood` table.
#[allow(dead_code)] // not every test binary uses it
pub fn scenario_table() -> Table {
    Table::new(vec![
        Column::new("country", vec![s("India"), s("India"), s("US")]),
        Column::new("likelihood", vec![s("High"), s("Low"), s("High")]),
    ])
    .unwrap()
}

/// A larger table with more than ten distinct countries and some gaps.
#[allow(dead_code)] // not every test binary uses it
pub fn climate_table() -> Table {
    let countries = [
        "India", "US", "China", "Russia", "Brazil", "Nigeria", "Mexico", "Iran", "Japan",
        "Canada", "Egypt", "Kenya",
    ];
    let mut country = Vec::new();
    let mut region = Vec::new();
    let mut start_year = Vec::new();
    for (i, name) in countries.iter().enumerate() {
        // country i appears i + 1 times
        for j in 0..=i {
            country.push(s(name));
            region.push(s(if j % 2 == 0 { "Asia" } else { "Europe" }));
            start_year.push(if j == 0 {
                Cell::Null
            } else {
                Cell::Integer(2015 + j as i64)
            });
        }
    }
    Table::new(vec![
        Column::new("country", country),
        Column::new("region", region),
        Column::new("start_year", start_year),
    ])
    .unwrap()
}

/// Serve `state` on an ephemeral port and return its base URL.
pub async fn spawn_server(state: AppState) -> String {
    let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0)))
        .await
        .unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(app::serve(listener, state, std::future::pending()));
    format!("http://{addr}")
}

#[allow(dead_code)] // not every test binary uses it
pub async fn spawn_with_table(table: Table) -> String {
    spawn_server(AppState::new(QueryService::new(table))).await
}
