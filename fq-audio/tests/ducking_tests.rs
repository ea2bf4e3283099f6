//! Background music and ducking tests

mod helpers;

use fq_audio::{BackgroundMusicState, Playable, PlayOptions, DUCK_RATIO};
use fq_common::AudioEvent;
use helpers::{assert_volume, drain_event_types, drain_events, sim, Harness};

#[tokio::test]
async fn test_priority_sound_ducks_and_restores_music() {
    let mut h = Harness::new();
    let (music, hm) = sim("theme.ogg");
    let (a, ha) = sim("fanfare.mp3");

    h.ctl.play_background_music(hm, 0.8, true).await;
    assert_volume(music.volume(), 0.8);

    h.ctl.play(ha, PlayOptions::priority()).await;
    assert_eq!(music.volume(), 0.8 * DUCK_RATIO);
    assert_volume(h.ctl.get_background_music_state().volume, 0.16);
    assert_volume(h.ctl.get_background_music_state().original_volume, 0.8);

    a.finish();
    h.pump().await;
    assert_volume(music.volume(), 0.8);
    assert_eq!(
        h.ctl.get_background_music_state(),
        BackgroundMusicState {
            is_playing: true,
            volume: 0.8,
            original_volume: 0.8,
            enable_ducking: true,
        }
    );
}

#[tokio::test]
async fn test_music_started_during_priority_starts_ducked() {
    let mut h = Harness::new();
    let (_, ha) = sim("fanfare.mp3");
    let (music, hm) = sim("theme.ogg");

    h.ctl.play(ha, PlayOptions::priority()).await;
    h.ctl.play_background_music(hm, 0.5, true).await;

    assert!(music.is_playing());
    assert!(music.is_looping(), "background music always loops");
    assert_volume(music.volume(), 0.5 * DUCK_RATIO);

    let state = h.ctl.get_background_music_state();
    assert_volume(state.original_volume, 0.5);
    assert!(state.is_playing);
}

#[tokio::test]
async fn test_ducking_disabled_music_never_ducks() {
    let mut h = Harness::new();
    let (music, hm) = sim("theme.ogg");
    let (_, ha) = sim("fanfare.mp3");

    h.ctl.play_background_music(hm, 0.6, false).await;
    h.ctl.play(ha, PlayOptions::priority()).await;

    assert_volume(music.volume(), 0.6);
    assert!(!h.ctl.get_background_music_state().enable_ducking);
}

#[tokio::test]
async fn test_toggling_ducking_applies_immediately() {
    let mut h = Harness::new();
    let (music, hm) = sim("theme.ogg");
    let (_, ha) = sim("fanfare.mp3");

    h.ctl.play_background_music(hm, 0.8, true).await;
    h.ctl.play(ha, PlayOptions::priority()).await;
    assert_volume(music.volume(), 0.16);

    h.ctl.set_background_music_ducking(false);
    assert_volume(music.volume(), 0.8);

    h.ctl.set_background_music_ducking(true);
    assert_volume(music.volume(), 0.16);
}

#[tokio::test]
async fn test_volume_change_while_ducked_keeps_duck() {
    let mut h = Harness::new();
    let (music, hm) = sim("theme.ogg");
    let (a, ha) = sim("fanfare.mp3");

    h.ctl.play_background_music(hm, 0.8, true).await;
    h.ctl.play(ha, PlayOptions::priority()).await;

    h.ctl.set_background_music_volume(0.5);
    assert_volume(music.volume(), 0.5 * DUCK_RATIO);
    assert_volume(h.ctl.get_background_music_state().original_volume, 0.5);

    a.finish();
    h.pump().await;
    assert_volume(music.volume(), 0.5);
}

#[tokio::test]
async fn test_stopping_priority_sound_restores_music() {
    let mut h = Harness::new();
    let (music, hm) = sim("theme.ogg");
    let (a, ha) = sim("fanfare.mp3");

    h.ctl.play_background_music(hm, 0.8, true).await;
    h.ctl.play(ha.clone(), PlayOptions::priority()).await;
    h.ctl.stop_sound(&ha);

    assert!(!a.is_playing());
    assert!(h.ctl.priority_source().is_none());
    assert_volume(music.volume(), 0.8);
}

#[tokio::test]
async fn test_paused_priority_unducks_on_event() {
    let mut h = Harness::new();
    let (music, hm) = sim("theme.ogg");
    let (a, ha) = sim("fanfare.mp3");

    h.ctl.play_background_music(hm, 0.8, true).await;
    h.ctl.play(ha, PlayOptions::priority()).await;

    a.pause().unwrap();
    h.pump().await;
    assert_volume(music.volume(), 0.8);

    // Resuming ducks again
    a.start().await.unwrap();
    h.pump().await;
    assert_volume(music.volume(), 0.16);
}

#[tokio::test]
async fn test_replacing_music_stops_old_track() {
    let mut h = Harness::new();
    let mut rx = h.ctl.subscribe();
    let (old, h1) = sim("menu.ogg");
    let (new, h2) = sim("battle.ogg");

    h.ctl.play_background_music(h1, 0.7, true).await;
    h.ctl.play_background_music(h2, 0.4, true).await;

    assert!(!old.is_playing());
    assert_eq!(old.stop_count(), 1);
    assert!(new.is_playing());
    assert_volume(new.volume(), 0.4);

    let stopped: Vec<String> = drain_events(&mut rx)
        .into_iter()
        .filter_map(|e| match e {
            AudioEvent::BackgroundMusicStopped { source, .. } => Some(source),
            _ => None,
        })
        .collect();
    assert_eq!(stopped, vec!["menu.ogg".to_string()]);
}

#[tokio::test]
async fn test_stop_background_music_is_idempotent() {
    let mut h = Harness::new();
    let mut rx = h.ctl.subscribe();
    let (music, hm) = sim("theme.ogg");

    // Nothing playing yet
    h.ctl.stop_background_music();
    assert_eq!(
        h.ctl.get_background_music_state(),
        BackgroundMusicState::default()
    );

    h.ctl.play_background_music(hm, 0.8, true).await;
    h.ctl.stop_background_music();
    h.ctl.stop_background_music();

    assert!(!music.is_playing());
    assert_eq!(music.stop_count(), 1);
    assert!(!h.ctl.get_background_music_state().is_playing);

    let types = drain_event_types(&mut rx);
    let stops = types
        .iter()
        .filter(|t| **t == "BackgroundMusicStopped")
        .count();
    assert_eq!(stops, 1);
}

#[tokio::test]
async fn test_background_volume_is_clamped() {
    let mut h = Harness::new();
    let (music, hm) = sim("theme.ogg");

    h.ctl.play_background_music(hm, 1.7, true).await;
    assert_volume(music.volume(), 1.0);

    h.ctl.set_background_music_volume(-0.5);
    assert_volume(music.volume(), 0.0);

    // Non-finite input leaves the current level alone
    h.ctl.set_background_music_volume(f32::NAN);
    assert_volume(h.ctl.get_background_music_state().original_volume, 0.0);
}

#[tokio::test]
async fn test_volume_changes_are_published() {
    let mut h = Harness::new();
    let (_, hm) = sim("theme.ogg");
    let (a, ha) = sim("fanfare.mp3");

    h.ctl.play_background_music(hm, 0.8, true).await;
    let mut rx = h.ctl.subscribe();

    h.ctl.play(ha, PlayOptions::priority()).await;
    a.finish();
    h.pump().await;

    let changes: Vec<bool> = drain_events(&mut rx)
        .into_iter()
        .filter_map(|e| match e {
            AudioEvent::BackgroundVolumeChanged { ducked, .. } => Some(ducked),
            _ => None,
        })
        .collect();
    assert_eq!(changes, vec![true, false]);
}
