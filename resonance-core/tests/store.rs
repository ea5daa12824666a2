use resonance_core::artist::{Artist, RelationshipKind};
use resonance_core::logging::init_stdout_logging;
use resonance_core::personality::Archetype;
use resonance_core::random::ScriptedRandom;
use resonance_core::store::{
    ArtistRecord, CollaborationRecord, FileStore, FileStoreConfig, InfluenceEventRecord, RecordStore,
};

#[tokio::test]
async fn file_store_survives_reopen() {
    init_stdout_logging("debug");
    let dir = tempfile::tempdir().unwrap();
    let mut rng = ScriptedRandom::constant(0.0);

    let mut sage = Artist::new("artist-4", "Sage", Archetype::Poet);
    let art = sage.create_autonomous_art(Some("rain"), &mut rng);
    {
        let store = FileStore::new(FileStoreConfig::new(dir.path())).await.unwrap();
        store.create_artist(ArtistRecord::from(&sage)).await.unwrap();
        store.create_artwork(art.clone()).await.unwrap();
        store
            .create_collaboration(CollaborationRecord::new(&art, vec!["artist-4".into(), "artist-1".into()]))
            .await
            .unwrap();
        store
            .create_influence_event(InfluenceEventRecord::new("artist-1", "artist-4", 0.9, RelationshipKind::Collaborate))
            .await
            .unwrap();
    }

    let store = FileStore::new(FileStoreConfig::new(dir.path())).await.unwrap();
    let record = store.get_artist("artist-4").await.unwrap().unwrap();
    assert_eq!(record.portfolio_size, 1);

    let portfolio = store.artworks_by_artist("artist-4").await.unwrap();
    assert_eq!(portfolio, vec![art.clone()]);
    assert_eq!(record.into_artist(portfolio), sage);

    assert_eq!(store.get_artwork(&art.id).await.unwrap(), Some(art));
    assert_eq!(store.list_collaborations().await.unwrap().len(), 1);
    let events = store.list_influence_events().await.unwrap();
    assert_eq!(events[0].relationship, RelationshipKind::Collaborate);
}

#[tokio::test]
async fn update_rewrites_the_collection() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::new(FileStoreConfig::new(dir.path())).await.unwrap();

    let mut atlas = Artist::new("artist-2", "Atlas", Archetype::Architect);
    let luna = Artist::new("artist-1", "Luna", Archetype::Dreamer);
    store.create_artist(ArtistRecord::from(&atlas)).await.unwrap();
    store.create_artist(ArtistRecord::from(&luna)).await.unwrap();
    assert!(store.create_artist(ArtistRecord::from(&luna)).await.is_err());

    atlas.personality.energy = 7.5;
    store.upsert_artist(ArtistRecord::from(&atlas)).await.unwrap();

    let content = std::fs::read_to_string(dir.path().join("artists.jsonl")).unwrap();
    assert_eq!(content.lines().count(), 2);

    let reopened = FileStore::new(FileStoreConfig::new(dir.path())).await.unwrap();
    let listed = reopened.list_artists().await.unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].id, "artist-2");
    assert_eq!(listed[0].personality.energy, 7.5);
}

#[tokio::test]
async fn bad_lines_are_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let luna = Artist::new("artist-1", "Luna", Archetype::Dreamer);
    let line = serde_json::to_string(&ArtistRecord::from(&luna)).unwrap();
    std::fs::write(dir.path().join("artists.jsonl"), format!("{}\n{{\"id\": \"torn\n\n", line)).unwrap();

    let store = FileStore::new(FileStoreConfig::new(dir.path())).await.unwrap();
    let listed = store.list_artists().await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].name, "Luna");
}
