//! Reference Data Integration Tests

use cms_broker::{InMemoryBroker, ReferenceDataBroker, ResourceBroker};
use cms_common::Error;
use cms_reference::{Category, Country, Language, SiteUrls};

use crate::common::{test_config, TestCms};

mod common;

async fn seed_languages(broker: &dyn ResourceBroker) {
    let rows = [(1, "English", "en", 1), (2, "German", "de", 2), (3, "French", "fr", 2)];
    for (id, name, short, priority) in rows {
        broker
            .write_language(Language::new(id, name.to_string(), short.to_string(), priority).unwrap())
            .await
            .unwrap();
    }
}

#[test_log::test(tokio::test)]
async fn test_default_language_resolves() {
    let cms = TestCms::new().await.unwrap();
    seed_languages(&cms.broker).await;

    let language = cms
        .broker
        .read_language_by_short_name(&cms.config.default_language)
        .await
        .unwrap();
    assert_eq!(language.short_name, cms.config.default_language);

    let ordered: Vec<String> = cms
        .broker
        .read_languages()
        .await
        .unwrap()
        .into_iter()
        .map(|l| l.name)
        .collect();
    // Priority first, then name
    assert_eq!(ordered, vec!["English", "French", "German"]);
}

#[test_log::test(tokio::test)]
async fn test_site_url_aliases() {
    let config = test_config();
    let broker = InMemoryBroker::new();

    broker
        .write_site_url(SiteUrls::new(1, config.site_url.clone(), 1, None).unwrap())
        .await
        .unwrap();
    broker
        .write_site_url(SiteUrls::new(2, "http://127.0.0.1:8080".to_string(), 1, Some(1)).unwrap())
        .await
        .unwrap();

    let urls = broker.read_site_urls(1).await.unwrap();
    assert_eq!(urls.len(), 2);
    assert!(urls[0].is_primary());
    assert_eq!(urls[0].url, config.site_url);
    assert_eq!(urls[1].primary_url_id, Some(1));

    assert!(broker.read_site_urls(2).await.unwrap().is_empty());
    assert!(matches!(
        broker
            .write_site_url(SiteUrls::new(3, "http://alias.example".to_string(), 1, Some(2)).unwrap())
            .await,
        Err(Error::Validation(_))
    ));
}

#[test_log::test(tokio::test)]
async fn test_categories_and_countries_upsert() {
    let broker = InMemoryBroker::new();

    broker
        .write_category(Category::new(1, "News".to_string(), "news".to_string(), 10).unwrap())
        .await
        .unwrap();
    broker
        .write_category(Category::new(2, "Events".to_string(), "events".to_string(), 20).unwrap())
        .await
        .unwrap();
    broker
        .write_category(Category::new(2, "Events".to_string(), "events".to_string(), 5).unwrap())
        .await
        .unwrap();

    let categories = broker.read_categories().await.unwrap();
    assert_eq!(categories.len(), 2);
    assert_eq!(categories[0].short_name, "events");

    broker
        .write_country(Country::new(1, "Switzerland".to_string(), "CH".to_string(), 1).unwrap())
        .await
        .unwrap();
    assert_eq!(broker.read_countries().await.unwrap()[0].short_name, "CH");
}
