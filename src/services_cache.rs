use std::sync::{Arc, RwLock};

use sqlx::PgPool;
use uuid::Uuid;

use crate::db::{DatabaseError, Service, ServiceRepository};

/// In-memory read model of the services table.
///
/// Populated once at startup and reloaded after every administrator
/// mutation, so slot requests never pay a catalogue query. Staleness is
/// bounded by the next admin write, which is acceptable for rows that
/// change a few times a year.
#[derive(Debug, Clone, Default)]
pub struct ServicesCache {
    inner: Arc<RwLock<Vec<Service>>>,
}

impl ServicesCache {
    pub async fn reload(&self, pool: &PgPool) -> Result<(), DatabaseError> {
        let services = ServiceRepository::list_all(pool).await?;
        self.replace(services);
        Ok(())
    }

    pub fn current(&self) -> Vec<Service> {
        self.inner.read().unwrap().clone()
    }

    pub fn find(&self, service_id: Uuid) -> Option<Service> {
        self.inner
            .read()
            .unwrap()
            .iter()
            .find(|service| service.id == service_id)
            .cloned()
    }

    fn replace(&self, services: Vec<Service>) {
        *self.inner.write().unwrap() = services;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn service(title: &str) -> Service {
        Service {
            id: Uuid::new_v4(),
            title: title.into(),
            duration_minutes: 30,
            price: 22.0,
            created_at: datetime!(2025-01-01 0:00 UTC),
            updated_at: datetime!(2025-01-01 0:00 UTC),
        }
    }

    #[test]
    fn starts_empty_and_replaces_wholesale() {
        let cache = ServicesCache::default();
        assert!(cache.current().is_empty());

        cache.replace(vec![service("Tondeuse"), service("Ciseaux")]);
        assert_eq!(cache.current().len(), 2);

        cache.replace(vec![service("Rasage complet")]);
        let current = cache.current();
        assert_eq!(current.len(), 1);
        assert_eq!(current[0].title, "Rasage complet");
    }

    #[test]
    fn finds_services_by_id() {
        let cache = ServicesCache::default();
        let wanted = service("Tondeuse");
        let wanted_id = wanted.id;
        cache.replace(vec![wanted, service("Ciseaux")]);

        assert_eq!(cache.find(wanted_id).map(|s| s.title), Some("Tondeuse".into()));
        assert!(cache.find(Uuid::new_v4()).is_none());
    }
}
