//! Sound cues for match events.
//!
//! `SoundBoard` knows the asset layout under the sound root and picks which
//! file a cue plays. Actual playback goes through an [`AudioSink`]. When the
//! sound folder or the announcer's fight call is missing, audio is disabled
//! and every cue is dropped.

use crate::game::MatchEvent;
use rand::seq::SliceRandom;
use rand::Rng;
use std::path::{Path, PathBuf};

/// Cues kept by [`RecordingSink`].
const RECORDED_CUES_MAX: usize = 64;

/// Separate channels so frequent effects do not cut off the announcer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Announcer,
    Wind,
    Hit,
    Damage,
    Music,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MusicMode {
    Menu,
    Fight,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cue {
    pub channel: Channel,
    pub path: PathBuf,
    pub looping: bool,
}

pub trait AudioSink {
    fn play(&mut self, cue: Cue);
    fn stop_music(&mut self);
}

/// Keeps the most recent cues. With `bell_on_hit`, hits also queue a
/// terminal bell for the UI loop to ring through its backend.
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub cues: Vec<Cue>,
    pub bell_on_hit: bool,
    pub music_stopped: bool,
    pending_bells: u32,
}

impl RecordingSink {
    pub fn new(bell_on_hit: bool) -> Self {
        Self {
            bell_on_hit,
            ..Self::default()
        }
    }

    /// Bells queued since the last call.
    pub fn take_bells(&mut self) -> u32 {
        std::mem::take(&mut self.pending_bells)
    }
}

impl AudioSink for RecordingSink {
    fn play(&mut self, cue: Cue) {
        tracing::trace!(channel = ?cue.channel, path = %cue.path.display(), "cue");
        if self.bell_on_hit && cue.channel == Channel::Hit {
            self.pending_bells += 1;
        }
        if cue.channel == Channel::Music {
            self.music_stopped = false;
        }
        if self.cues.len() >= RECORDED_CUES_MAX {
            self.cues.remove(0);
        }
        self.cues.push(cue);
    }

    fn stop_music(&mut self) {
        self.music_stopped = true;
    }
}

/// Sound root: the configured folder if it exists, else `./sounds`, else
/// `sounds/` next to the executable.
pub fn resolve_sound_root(configured: Option<&Path>) -> Option<PathBuf> {
    if let Some(dir) = configured {
        if dir.is_dir() {
            return Some(dir.to_path_buf());
        }
        tracing::warn!(dir = %dir.display(), "configured sound folder not found");
    }
    let local = PathBuf::from("sounds");
    if local.is_dir() {
        return Some(local);
    }
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|p| p.join("sounds")))
        .filter(|p| p.is_dir())
}

pub struct SoundBoard<S: AudioSink = RecordingSink> {
    enabled: bool,
    announcer_fight: Option<PathBuf>,
    announcer_end: Vec<PathBuf>,
    damage_taken: Vec<PathBuf>,
    wind: Vec<PathBuf>,
    hit: Vec<PathBuf>,
    menu_music: Option<PathBuf>,
    fight_music: Vec<PathBuf>,
    music_mode: Option<MusicMode>,
    sink: S,
}

fn existing(root: &Path, rel: &str) -> Option<PathBuf> {
    let path = root.join(rel);
    if path.is_file() {
        Some(path)
    } else {
        tracing::debug!(path = %path.display(), "sound file missing");
        None
    }
}

impl<S: AudioSink> SoundBoard<S> {
    pub fn new(root: Option<PathBuf>, sink: S) -> Self {
        let mut board = Self {
            enabled: false,
            announcer_fight: None,
            announcer_end: Vec::new(),
            damage_taken: Vec::new(),
            wind: Vec::new(),
            hit: Vec::new(),
            menu_music: None,
            fight_music: Vec::new(),
            music_mode: None,
            sink,
        };

        let Some(root) = root else {
            tracing::warn!("sounds folder not found; running without sound");
            return board;
        };

        board.announcer_fight = existing(&root, "announcer/fight.mp3");
        board.announcer_end = ["laugh", "excellent"]
            .iter()
            .filter_map(|name| existing(&root, &format!("announcer/{name}.mp3")))
            .collect();
        board.damage_taken = (192..=200)
            .filter_map(|i| existing(&root, &format!("damagetaken/mk1-{i:05}.mp3")))
            .collect();
        board.wind = (59..=62)
            .filter_map(|i| existing(&root, &format!("hitsounds/wind-{i:05}.mp3")))
            .collect();
        board.hit = (48..=55)
            .filter_map(|i| existing(&root, &format!("hitsounds/hit-{i:05}.mp3")))
            .collect();
        board.menu_music = existing(&root, "music/MainMenu.mp3");
        board.fight_music = (1..=4)
            .filter_map(|i| existing(&root, &format!("music/Track{i}.mp3")))
            .collect();

        if board.announcer_fight.is_none() {
            tracing::warn!(root = %root.display(), "missing announcer/fight.mp3; disabling sound");
            return board;
        }
        board.enabled = true;
        tracing::info!(
            root = %root.display(),
            hits = board.hit.len(),
            tracks = board.fight_music.len(),
            "sound enabled"
        );
        board
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn music_mode(&self) -> Option<MusicMode> {
        self.music_mode
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    fn play(&mut self, channel: Channel, path: Option<PathBuf>) {
        if !self.enabled {
            return;
        }
        if let Some(path) = path {
            self.sink.play(Cue {
                channel,
                path,
                looping: false,
            });
        }
    }

    fn pick<R: Rng>(list: &[PathBuf], rng: &mut R) -> Option<PathBuf> {
        list.choose(rng).cloned()
    }

    pub fn play_round_start(&mut self) {
        let path = self.announcer_fight.clone();
        self.play(Channel::Announcer, path);
    }

    pub fn play_match_end<R: Rng>(&mut self, rng: &mut R) {
        let path = Self::pick(&self.announcer_end, rng);
        self.play(Channel::Announcer, path);
    }

    pub fn play_wind<R: Rng>(&mut self, rng: &mut R) {
        let path = Self::pick(&self.wind, rng);
        self.play(Channel::Wind, path);
    }

    pub fn play_hit<R: Rng>(&mut self, rng: &mut R) {
        let path = Self::pick(&self.hit, rng);
        self.play(Channel::Hit, path);
    }

    pub fn play_damage_taken<R: Rng>(&mut self, rng: &mut R) {
        let path = Self::pick(&self.damage_taken, rng);
        self.play(Channel::Damage, path);
    }

    /// Looping menu theme; no-op if it is already the current mode.
    pub fn play_menu_music(&mut self) {
        if !self.enabled || self.music_mode == Some(MusicMode::Menu) {
            return;
        }
        self.music_mode = Some(MusicMode::Menu);
        if let Some(path) = self.menu_music.clone() {
            self.sink.play(Cue {
                channel: Channel::Music,
                path,
                looping: true,
            });
        }
    }

    /// One random fight track; no-op if fight music is already playing.
    ///
    /// The track plays once and is not followed by another: sinks report no
    /// end-of-track, so there is nothing to chain the next track from.
    pub fn play_fight_music<R: Rng>(&mut self, rng: &mut R) {
        if !self.enabled || self.music_mode == Some(MusicMode::Fight) {
            return;
        }
        self.music_mode = Some(MusicMode::Fight);
        if let Some(path) = Self::pick(&self.fight_music, rng) {
            self.sink.play(Cue {
                channel: Channel::Music,
                path,
                looping: false,
            });
        }
    }

    pub fn stop_music(&mut self) {
        if !self.enabled {
            return;
        }
        self.sink.stop_music();
        self.music_mode = None;
    }

    pub fn handle_event<R: Rng>(&mut self, event: &MatchEvent, rng: &mut R) {
        match event {
            MatchEvent::RoundStart { .. } => self.play_round_start(),
            MatchEvent::Fight => self.play_fight_music(rng),
            MatchEvent::Whoosh { .. } => self.play_wind(rng),
            MatchEvent::Hit { .. } => self.play_hit(rng),
            MatchEvent::DamageTaken { .. } => self.play_damage_taken(rng),
            MatchEvent::MatchEnd { .. } => self.play_match_end(rng),
            MatchEvent::Block { .. } | MatchEvent::RoundEnd { .. } => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fighter::PlayerSlot;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::fs;

    fn sound_dir(tag: &str, with_fight: bool) -> PathBuf {
        let root = std::env::temp_dir().join(format!("mkultra_sounds_{}_{}", tag, std::process::id()));
        let _ = fs::remove_dir_all(&root);
        for sub in ["announcer", "damagetaken", "hitsounds", "music"] {
            fs::create_dir_all(root.join(sub)).unwrap();
        }
        let mut files = vec![
            "announcer/laugh.mp3".to_string(),
            "damagetaken/mk1-00192.mp3".to_string(),
            "damagetaken/mk1-00200.mp3".to_string(),
            "hitsounds/wind-00059.mp3".to_string(),
            "hitsounds/hit-00048.mp3".to_string(),
            "hitsounds/hit-00055.mp3".to_string(),
            "hitsounds/hit-00056.mp3".to_string(),
            "music/MainMenu.mp3".to_string(),
            "music/Track2.mp3".to_string(),
        ];
        if with_fight {
            files.push("announcer/fight.mp3".to_string());
        }
        for f in files {
            fs::write(root.join(f), b"").unwrap();
        }
        root
    }

    #[test]
    fn test_missing_root_disables_audio() {
        let mut board = SoundBoard::new(None, RecordingSink::default());
        assert!(!board.is_enabled());
        board.play_round_start();
        board.play_menu_music();
        assert!(board.sink().cues.is_empty());
        assert_eq!(board.music_mode(), None);
    }

    #[test]
    fn test_missing_fight_call_disables_audio() {
        let root = sound_dir("nofight", false);
        let board = SoundBoard::new(Some(root.clone()), RecordingSink::default());
        assert!(!board.is_enabled());
        let _ = fs::remove_dir_all(&root);
    }

    #[test]
    fn test_variants_follow_numbered_layout() {
        let root = sound_dir("layout", true);
        let board = SoundBoard::new(Some(root.clone()), RecordingSink::default());
        assert!(board.is_enabled());
        assert_eq!(board.damage_taken.len(), 2);
        assert_eq!(board.wind.len(), 1);
        // hit-00056 is outside the 48..=55 range.
        assert_eq!(board.hit.len(), 2);
        assert_eq!(board.announcer_end.len(), 1);
        assert_eq!(board.fight_music, vec![root.join("music/Track2.mp3")]);
        let _ = fs::remove_dir_all(&root);
    }

    #[test]
    fn test_events_route_to_channels() {
        let root = sound_dir("events", true);
        let mut board = SoundBoard::new(Some(root.clone()), RecordingSink::default());
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        let events = [
            MatchEvent::RoundStart { round: 1 },
            MatchEvent::Fight,
            MatchEvent::Whoosh { attacker: PlayerSlot::P1 },
            MatchEvent::Block {
                attacker: PlayerSlot::P1,
                defender: PlayerSlot::P2,
            },
            MatchEvent::Hit {
                attacker: PlayerSlot::P1,
                defender: PlayerSlot::P2,
                damage: 4,
            },
            MatchEvent::DamageTaken { defender: PlayerSlot::P2 },
            MatchEvent::MatchEnd { winner: Some(PlayerSlot::P1) },
        ];
        for e in &events {
            board.handle_event(e, &mut rng);
        }

        let channels: Vec<Channel> = board.sink().cues.iter().map(|c| c.channel).collect();
        assert_eq!(
            channels,
            [
                Channel::Announcer,
                Channel::Music,
                Channel::Wind,
                Channel::Hit,
                Channel::Damage,
                Channel::Announcer
            ]
        );
        assert_eq!(board.sink().cues[0].path, root.join("announcer/fight.mp3"));
        assert_eq!(board.music_mode(), Some(MusicMode::Fight));
        let _ = fs::remove_dir_all(&root);
    }

    #[test]
    fn test_music_mode_does_not_restart() {
        let root = sound_dir("music", true);
        let mut board = SoundBoard::new(Some(root.clone()), RecordingSink::default());
        let mut rng = ChaCha8Rng::seed_from_u64(2);

        board.play_menu_music();
        board.play_menu_music();
        assert_eq!(board.sink().cues.len(), 1);
        assert!(board.sink().cues[0].looping);

        board.play_fight_music(&mut rng);
        board.play_fight_music(&mut rng);
        assert_eq!(board.sink().cues.len(), 2);

        board.stop_music();
        assert!(board.sink().music_stopped);
        assert_eq!(board.music_mode(), None);
        let _ = fs::remove_dir_all(&root);
    }

    #[test]
    fn test_bell_is_queued_for_hits_only() {
        let root = sound_dir("bell", true);
        let mut board = SoundBoard::new(Some(root.clone()), RecordingSink::new(true));
        let mut rng = ChaCha8Rng::seed_from_u64(4);

        board.play_wind(&mut rng);
        board.play_hit(&mut rng);
        board.play_hit(&mut rng);
        assert_eq!(board.sink_mut().take_bells(), 2);
        assert_eq!(board.sink_mut().take_bells(), 0);

        let mut quiet = SoundBoard::new(Some(root.clone()), RecordingSink::new(false));
        quiet.play_hit(&mut rng);
        assert_eq!(quiet.sink_mut().take_bells(), 0);
        let _ = fs::remove_dir_all(&root);
    }

    #[test]
    fn test_resolve_prefers_existing_configured_dir() {
        let root = sound_dir("resolve", true);
        assert_eq!(resolve_sound_root(Some(&root)), Some(root.clone()));
        let _ = fs::remove_dir_all(&root);
    }
}
