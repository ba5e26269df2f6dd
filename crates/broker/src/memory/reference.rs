//! Reference data broker

use cms_common::{Error, Result};
use cms_reference::{sort_by_priority, Category, Country, Language, SiteUrls};

use super::InMemoryBroker;
use crate::contracts::ReferenceDataBroker;

#[async_trait::async_trait]
impl ReferenceDataBroker for InMemoryBroker {
    async fn write_category(&self, category: Category) -> Result<()> {
        let mut store = self.store().write().await;
        tracing::debug!(id = category.id, "Wrote category");
        store.categories.insert(category.id, category);
        Ok(())
    }

    async fn write_country(&self, country: Country) -> Result<()> {
        let mut store = self.store().write().await;
        tracing::debug!(id = country.id, "Wrote country");
        store.countries.insert(country.id, country);
        Ok(())
    }

    async fn write_language(&self, language: Language) -> Result<()> {
        let mut store = self.store().write().await;
        if store
            .languages
            .values()
            .any(|l| l.id != language.id && l.short_name == language.short_name)
        {
            return Err(Error::Conflict(format!(
                "Language '{}' already exists",
                language.short_name
            )));
        }
        tracing::debug!(id = language.id, "Wrote language");
        store.languages.insert(language.id, language);
        Ok(())
    }

    async fn write_site_url(&self, site_url: SiteUrls) -> Result<()> {
        let mut store = self.store().write().await;

        if let Some(primary_id) = site_url.primary_url_id {
            let primary = store.site_urls.get(&primary_id).ok_or_else(|| {
                Error::NotFound(format!("Primary site URL {}", primary_id))
            })?;
            if !primary.is_primary() || primary.site_id != site_url.site_id {
                return Err(Error::Validation(format!(
                    "Site URL {} must alias a primary URL of site {}",
                    site_url.url, site_url.site_id
                )));
            }
        } else if store
            .site_urls
            .values()
            .any(|u| u.id != site_url.id && u.is_primary() && u.site_id == site_url.site_id)
        {
            return Err(Error::Conflict(format!(
                "Site {} already has a primary URL",
                site_url.site_id
            )));
        }

        // A primary with aliases must stay a primary of the same site
        if let Some(stored) = store.site_urls.get(&site_url.id) {
            let reshaped = !site_url.is_primary() || stored.site_id != site_url.site_id;
            let has_aliases = store
                .site_urls
                .values()
                .any(|u| u.primary_url_id == Some(site_url.id));
            if stored.is_primary() && reshaped && has_aliases {
                return Err(Error::Validation(format!(
                    "Site URL {} still has aliases",
                    site_url.id
                )));
            }
        }

        tracing::debug!(id = site_url.id, url = %site_url.url, "Wrote site URL");
        store.site_urls.insert(site_url.id, site_url);
        Ok(())
    }

    async fn read_categories(&self) -> Result<Vec<Category>> {
        let store = self.store().read().await;
        let mut rows: Vec<Category> = store.categories.values().cloned().collect();
        sort_by_priority(&mut rows);
        Ok(rows)
    }

    async fn read_countries(&self) -> Result<Vec<Country>> {
        let store = self.store().read().await;
        let mut rows: Vec<Country> = store.countries.values().cloned().collect();
        sort_by_priority(&mut rows);
        Ok(rows)
    }

    async fn read_languages(&self) -> Result<Vec<Language>> {
        let store = self.store().read().await;
        let mut rows: Vec<Language> = store.languages.values().cloned().collect();
        sort_by_priority(&mut rows);
        Ok(rows)
    }

    async fn read_language_by_short_name(&self, short_name: &str) -> Result<Language> {
        let store = self.store().read().await;
        store
            .languages
            .values()
            .find(|l| l.short_name == short_name)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("Language '{}'", short_name)))
    }

    async fn read_site_urls(&self, site_id: i32) -> Result<Vec<SiteUrls>> {
        let store = self.store().read().await;
        let mut rows: Vec<SiteUrls> = store
            .site_urls
            .values()
            .filter(|u| u.site_id == site_id)
            .cloned()
            .collect();
        rows.sort_by_key(|u| (!u.is_primary(), u.id));
        Ok(rows)
    }
}
