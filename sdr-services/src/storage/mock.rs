//! Built-in demo accounts served when no backend is reachable

use sdr_core::Account;

fn demo_account(
    id: &str,
    name: &str,
    industry: &str,
    location: &str,
    employees: u64,
    website: &str,
) -> Account {
    Account {
        industry: Some(industry.to_string()),
        location: Some(location.to_string()),
        employees: Some(employees),
        website: Some(website.to_string()),
        ..Account::new(id, name)
    }
}

/// The fixed mock account list
pub fn mock_accounts() -> Vec<Account> {
    vec![
        demo_account(
            "mock1",
            "Acme Corporation",
            "Technology",
            "San Francisco, CA",
            500,
            "https://acme.example.com",
        ),
        demo_account(
            "mock2",
            "TechGiant Inc",
            "Software",
            "Seattle, WA",
            10_000,
            "https://techgiant.example.com",
        ),
        demo_account(
            "mock3",
            "Global Financial",
            "Finance",
            "New York, NY",
            2_500,
            "https://globalfinancial.example.com",
        ),
        demo_account(
            "mock4",
            "Healthcare Systems",
            "Healthcare",
            "Boston, MA",
            1_200,
            "https://healthcare.example.com",
        ),
        demo_account(
            "mock5",
            "Retail Stores",
            "Retail",
            "Chicago, IL",
            3_000,
            "https://retailstores.example.com",
        ),
    ]
}
