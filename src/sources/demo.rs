//! Built-in demo organization, served when `use_mock_data` is enabled

use super::OrganizationSource;
use crate::domain::Employee;
use crate::error::Result;
use async_trait::async_trait;
use std::time::Duration;
use tracing::info;

const ROSTER: &[(&str, &[(&str, &str)])] = &[
    (
        "Finance Department",
        &[
            ("Andrew Barnes", "123456789"),
            ("Gregory Evans", "234567890"),
            ("Jacob Smith", "345678901"),
            ("Alex Ryan", "456789012"),
        ],
    ),
    (
        "Accounting",
        &[
            ("William Johnson", "567890123"),
            ("Damian Carter", "678901234"),
            ("Michael Anderson", "789012345"),
        ],
    ),
    (
        "IT",
        &[
            ("Philip Rogers", "890123456"),
            ("Dmitry Collins", "901234567"),
            ("Andrew Miller", "012345678"),
            ("Arvid Nelson", "123456780"),
        ],
    ),
];

/// Fixed three-department organization with a short simulated latency
#[derive(Debug, Clone)]
pub struct DemoOrganization {
    latency: Duration,
}

impl Default for DemoOrganization {
    fn default() -> Self {
        Self::new()
    }
}

impl DemoOrganization {
    pub fn new() -> Self {
        Self {
            latency: Duration::from_millis(10),
        }
    }

    pub fn with_latency(latency: Duration) -> Self {
        Self { latency }
    }
}

#[async_trait]
impl OrganizationSource for DemoOrganization {
    async fn active_departments(&self) -> Result<Vec<String>> {
        tokio::time::sleep(self.latency).await;
        info!("Using demo data for active departments");
        Ok(ROSTER.iter().map(|(name, _)| name.to_string()).collect())
    }

    async fn employees_in(&self, department: &str) -> Result<Vec<Employee>> {
        tokio::time::sleep(self.latency).await;
        info!("Using demo data for employees in department {}", department);

        ROSTER
            .iter()
            .find(|(name, _)| *name == department)
            .map(|(_, members)| members.iter())
            .into_iter()
            .flatten()
            .map(|(name, inn)| Employee::new(*name, *inn, department))
            .collect()
    }
}
