// src/catalog.rs

use std::{collections::HashSet, path::Path};

use anyhow::{bail, Context};
use serde::Serialize;

use crate::models::{Feature, Service};

/// Offerable services. Loaded once at startup and never persisted with the store.
#[derive(Debug, Clone)]
pub struct Catalog {
    services: Vec<Service>,
}

/// Totals for one service configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Quote {
    pub feature_ids: Vec<String>,
    pub total_price: u64,
    pub estimated_time: u32,
}

impl Service {
    pub fn feature(&self, feature_id: &str) -> Option<&Feature> {
        self.features.iter().find(|f| f.feature_id == feature_id)
    }

    /// Only ids present on this service count, each once, in catalog order.
    pub fn quote<S: AsRef<str>>(&self, selected: &[S]) -> Quote {
        let wanted: HashSet<&str> = selected.iter().map(AsRef::as_ref).collect();
        let picked: Vec<&Feature> = self
            .features
            .iter()
            .filter(|f| wanted.contains(f.feature_id.as_str()))
            .collect();

        Quote {
            feature_ids: picked.iter().map(|f| f.feature_id.clone()).collect(),
            total_price: self.base_price + picked.iter().map(|f| f.price).sum::<u64>(),
            estimated_time: self.base_time + picked.iter().map(|f| f.time).sum::<u32>(),
        }
    }
}

impl Catalog {
    pub fn new(services: Vec<Service>) -> anyhow::Result<Self> {
        let mut ids = HashSet::new();
        for s in &services {
            if !ids.insert(s.service_id.as_str()) {
                bail!("duplicate service id '{}'", s.service_id);
            }
            let mut feature_ids = HashSet::new();
            for f in &s.features {
                if !feature_ids.insert(f.feature_id.as_str()) {
                    bail!("duplicate feature id '{}' on service '{}'", f.feature_id, s.service_id);
                }
            }
        }
        Ok(Self { services })
    }

    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("read catalog file {}", path.display()))?;
        let services: Vec<Service> =
            serde_json::from_str(&raw).with_context(|| "parse catalog json")?;
        Self::new(services)
    }

    pub fn all(&self) -> &[Service] {
        &self.services
    }

    pub fn find(&self, service_id: &str) -> Option<&Service> {
        self.services.iter().find(|s| s.service_id == service_id)
    }
}

fn feature(id: &str, name: &str, price: u64, time: u32) -> Feature {
    Feature { feature_id: id.into(), name: name.into(), price, time }
}

impl Default for Catalog {
    fn default() -> Self {
        let services = vec![
            Service {
                service_id: "web-dev".into(),
                name: "Website Development".into(),
                description: "Custom websites tailored to your business needs with modern technologies".into(),
                base_price: 100_000,
                base_time: 7,
                features: vec![
                    feature("responsive", "Responsive Design", 30_000, 2),
                    feature("cms", "Content Management System", 50_000, 3),
                    feature("ecommerce", "E-commerce Integration", 80_000, 5),
                    feature("seo", "SEO Optimization", 5_000, 1),
                    feature("analytics", "Analytics Dashboard", 35_000, 2),
                    feature("multilang", "Multi-language Support", 60_000, 4),
                ],
            },
            Service {
                service_id: "app-dev".into(),
                name: "Mobile App Development".into(),
                description: "Native and cross-platform mobile applications for iOS and Android".into(),
                base_price: 300_000,
                base_time: 30,
                features: vec![
                    feature("ios", "iOS Development", 200_000, 10),
                    feature("android", "Android Development", 200_000, 10),
                    feature("push", "Push Notifications", 40_000, 3),
                    feature("offline", "Offline Mode", 60_000, 4),
                    feature("payment", "Payment Integration", 80_000, 5),
                    feature("social", "Social Login", 30_000, 2),
                ],
            },
            Service {
                service_id: "saas".into(),
                name: "SaaS Development".into(),
                description: "Scalable software-as-a-service platforms with subscription management".into(),
                base_price: 500_000,
                base_time: 45,
                features: vec![
                    feature("auth", "User Authentication", 50_000, 3),
                    feature("subscription", "Subscription Management", 120_000, 7),
                    feature("api", "REST API Development", 150_000, 8),
                    feature("dashboard", "Admin Dashboard", 100_000, 5),
                    feature("reports", "Reporting & Analytics", 80_000, 4),
                    feature("multitenancy", "Multi-tenancy Support", 200_000, 10),
                ],
            },
            Service {
                service_id: "automation".into(),
                name: "Business Automation".into(),
                description: "Streamline your workflows with custom automation solutions".into(),
                base_price: 200_000,
                base_time: 20,
                features: vec![
                    feature("workflow", "Workflow Automation", 80_000, 5),
                    feature("integration", "Third-party Integrations", 60_000, 4),
                    feature("email", "Email Automation", 40_000, 3),
                    feature("crm", "CRM Integration", 70_000, 4),
                    feature("reporting", "Automated Reporting", 50_000, 3),
                    feature("chatbot", "AI Chatbot", 120_000, 7),
                ],
            },
        ];
        Self { services }
    }
}
