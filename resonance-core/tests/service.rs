use std::sync::Arc;

use resonance_core::access::{OpenAccess, Tier, TierGate};
use resonance_core::api::{Caller, Request, ResonanceService};
use resonance_core::collective::Collective;
use resonance_core::config::{ResonanceConfig, StoreKind};
use resonance_core::random::ScriptedRandom;
use resonance_core::store::{MemoryStore, RecordStore};

async fn open_service() -> ResonanceService {
    let collective = Collective::with_rng(Box::new(ScriptedRandom::constant(0.0)))
        .with_default_artists()
        .unwrap();
    let service = ResonanceService::new(Arc::new(collective), Arc::new(MemoryStore::new()), Arc::new(OpenAccess));
    service.bootstrap().await.unwrap();
    service
}

fn parse(json: &str) -> Request {
    serde_json::from_str(json).unwrap()
}

#[tokio::test]
async fn gallery_lists_founders() {
    let service = open_service().await;
    let res = service.handle(&Caller::new("visitor"), parse(r#"{"action":"gallery"}"#)).await;

    assert_eq!(res.status, 200);
    let artists = res.body["resonance"]["artists"].as_array().unwrap();
    assert_eq!(artists.len(), 5);
    assert_eq!(artists[0]["name"], "Luna");
    assert_eq!(service.store().list_artists().await.unwrap().len(), 5);
}

#[tokio::test]
async fn create_persists_artwork_and_artist() {
    let service = open_service().await;
    let res = service
        .handle(&Caller::new("visitor"), parse(r#"{"action":"create","id":"artist-2","theme":"bridges","form":"music"}"#))
        .await;

    assert_eq!(res.status, 201);
    assert_eq!(res.body["artwork"]["form"], "music");
    assert!(res.body["artwork"]["description"].as_str().unwrap().contains("bridges"));

    let stored = service.store().artworks_by_artist("artist-2").await.unwrap();
    assert_eq!(stored.len(), 1);
    let record = service.store().get_artist("artist-2").await.unwrap().unwrap();
    assert_eq!(record.portfolio_size, 1);
    assert!((record.personality.evolution - 0.2).abs() < 1e-9);
}

#[tokio::test]
async fn collaborate_defaults_to_first_two_artists() {
    let service = open_service().await;
    let res = service.handle(&Caller::new("visitor"), parse(r#"{"action":"collaborate"}"#)).await;

    assert_eq!(res.status, 201);
    assert_eq!(res.body["collaboration"]["participants"], serde_json::json!(["artist-1", "artist-2"]));
    assert_eq!(res.body["collaboration"]["note"], "Luna collaborated with 1 artists");
    assert_eq!(service.store().list_collaborations().await.unwrap().len(), 1);
}

#[tokio::test]
async fn errors_map_to_status_codes() {
    let service = open_service().await;
    let caller = Caller::new("visitor");

    let res = service.handle(&caller, parse(r#"{"action":"artist","id":"nobody"}"#)).await;
    assert_eq!(res.status, 404);
    assert_eq!(res.body["success"], false);

    let res = service
        .handle(&caller, parse(r#"{"action":"collaborate","artists":["artist-1"]}"#))
        .await;
    assert_eq!(res.status, 400);
}

#[tokio::test]
async fn influence_is_recorded() {
    let service = open_service().await;
    let caller = Caller::new("visitor");
    let res = service
        .handle(&caller, parse(r#"{"action":"influence","artist_id":"artist-4","target_artist_id":"artist-1"}"#))
        .await;

    assert_eq!(res.status, 200);
    assert_eq!(res.body["influence"]["note"], "Sage was influenced by Luna's dreamer style");

    let events = service.store().list_influence_events().await.unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].from, "artist-1");
    assert_eq!(events[0].to, "artist-4");

    let res = service
        .handle(&caller, parse(r#"{"action":"top_influences","artist_id":"artist-4"}"#))
        .await;
    assert_eq!(res.body["influences"][0]["agent_id"], "artist-1");
}

#[tokio::test]
async fn tier_gate_limits_free_callers() {
    let collective = Collective::with_rng(Box::new(ScriptedRandom::constant(0.0)))
        .with_default_artists()
        .unwrap();
    let service = ResonanceService::new(Arc::new(collective), Arc::new(MemoryStore::new()), Arc::new(TierGate::new()));

    let free = Caller::new("alice");
    let create = || parse(r#"{"action":"autonomous_create","artist_id":"artist-5"}"#);
    assert_eq!(service.handle(&free, create()).await.status, 201);

    let denied = service.handle(&free, create()).await;
    assert_eq!(denied.status, 402);
    assert!(denied.body["error"].as_str().unwrap().contains("basic"));

    let res = service.handle(&free, parse(r#"{"action":"collaborate"}"#)).await;
    assert_eq!(res.status, 402);
    let pro = Caller::with_tier("bob", Tier::Pro);
    assert_eq!(service.handle(&pro, parse(r#"{"action":"collaborate"}"#)).await.status, 201);

    // Reading is never gated
    assert_eq!(service.handle(&free, parse(r#"{"action":"gallery"}"#)).await.status, 200);
}

#[tokio::test]
async fn failed_creation_uses_no_quota() {
    let collective = Collective::with_rng(Box::new(ScriptedRandom::constant(0.0)))
        .with_default_artists()
        .unwrap();
    let service = ResonanceService::new(Arc::new(collective), Arc::new(MemoryStore::new()), Arc::new(TierGate::new()));
    let free = Caller::new("carol");

    let res = service
        .handle(&free, parse(r#"{"action":"autonomous_create","artist_id":"nobody"}"#))
        .await;
    assert_eq!(res.status, 404);

    let create = || parse(r#"{"action":"autonomous_create","artist_id":"artist-1"}"#);
    assert_eq!(service.handle(&free, create()).await.status, 201);
    assert_eq!(service.handle(&free, create()).await.status, 402);
}

#[tokio::test]
async fn evolution_lists_the_timeline() {
    let service = open_service().await;
    let caller = Caller::new("visitor");
    service
        .handle(&caller, parse(r#"{"action":"create","id":"artist-2","theme":"arches"}"#))
        .await;

    let res = service.handle(&caller, parse(r#"{"action":"evolution","id":"artist-2"}"#)).await;
    assert_eq!(res.status, 200);
    let timeline = res.body["evolution"]["timeline"].as_array().unwrap();
    assert_eq!(timeline.len(), 1);
    assert_eq!(timeline[0]["type"], "creation");
    assert_eq!(res.body["evolution"]["stats"]["creations"], 1);

    let res = service.handle(&caller, parse(r#"{"action":"evolution","id":"nobody"}"#)).await;
    assert_eq!(res.status, 404);
}

#[tokio::test]
async fn artist_shows_stats_and_relationships() {
    let service = open_service().await;
    let caller = Caller::new("visitor");
    service.handle(&caller, parse(r#"{"action":"collaborate"}"#)).await;

    let res = service.handle(&caller, parse(r#"{"action":"artist","id":"artist-2"}"#)).await;
    assert_eq!(res.status, 200);
    let artist = &res.body["artist"];
    assert_eq!(artist["name"], "Atlas");
    assert_eq!(artist["archetype"], "architect");
    assert_eq!(artist["evolution_stats"]["collaborations"], 1);
    assert_eq!(artist["influences"], serde_json::json!(["artist-1"]));
}

#[tokio::test]
async fn restart_keeps_influences_and_evolution_log() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = ResonanceConfig::default();
    config.seed = Some(9);
    config.store.kind = StoreKind::File;
    config.store.dir = dir.path().to_path_buf();

    let before = {
        let service = ResonanceService::from_config(&config).await.unwrap();
        let res = service
            .handle(
                &Caller::new("visitor"),
                parse(r#"{"action":"influence","artist_id":"artist-4","target_artist_id":"artist-1"}"#),
            )
            .await;
        assert_eq!(res.status, 200);
        service.collective().evolution_timeline("artist-4").unwrap()
    };
    assert_eq!(before.len(), 1);

    let service = ResonanceService::from_config(&config).await.unwrap();
    let collective = service.collective();
    let top = collective.top_influences("artist-4", 3).unwrap();
    assert_eq!(top.len(), 1);
    assert_eq!(top[0].agent_id, "artist-1");
    assert_eq!(top[0].events, 1);
    assert_eq!(collective.evolution_timeline("artist-4").unwrap(), before);
    assert_eq!(collective.evolution_stats("artist-4").unwrap().influences, 1);
}

#[tokio::test]
async fn file_backed_service_restores_state() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = ResonanceConfig::default();
    config.seed = Some(5);
    config.store.kind = StoreKind::File;
    config.store.dir = dir.path().to_path_buf();

    let created_id = {
        let service = ResonanceService::from_config(&config).await.unwrap();
        let caller = Caller::new("visitor");
        service
            .handle(&caller, parse(r#"{"action":"autonomous_create","artist_id":"artist-1","theme":"moths"}"#))
            .await;
        let res = service.handle(&caller, parse(r#"{"action":"create_artist","archetype":"rebel"}"#)).await;
        assert_eq!(res.body["artist"]["name"], "Storm");
        res.body["artist"]["id"].as_str().unwrap().to_string()
    };

    let service = ResonanceService::from_config(&config).await.unwrap();
    let collective = service.collective();
    assert_eq!(collective.len(), 6);
    assert!(collective.contains(&created_id));
    assert_eq!(collective.artist("artist-1").unwrap().portfolio.len(), 1);
    assert_eq!(collective.gallery_state().stats.total_artworks, 1);
}

#[test]
fn requests_run_on_a_blocking_executor() {
    let service = tokio_test::block_on(open_service());
    let res = tokio_test::block_on(service.handle(&Caller::new("cli"), parse(r#"{"action":"reflect","artist_id":"artist-3"}"#)));
    assert_eq!(res.status, 200);
    assert!(res.body["reflection"].as_str().unwrap().starts_with("Phoenix's style has evolved"));
}
