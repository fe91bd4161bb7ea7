//! Audio boundary for the simulation.
//!
//! The simulation never mixes or waits on audio. It pushes [`SoundRequest`]s
//! into a [`SoundQueue`], which is shared with whichever thread owns the audio
//! backend. That thread runs an [`AudioSystem`] to drain the queue, forward
//! requests to a [`SoundSink`], and keep object-attached sounds following
//! their objects.

use engine_core::{ObjectId, Vec3};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Identifier of a sound resource, resolved by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SoundId(pub u32);

impl fmt::Display for SoundId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "snd#{}", self.0)
    }
}

/// "Play this sound here", optionally following an object.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SoundRequest {
    pub sound: SoundId,
    pub position: Vec3,
    pub attached_to: Option<ObjectId>,
    pub volume: f32,
}

impl SoundRequest {
    /// Play a sound at a fixed world position.
    pub fn at(sound: SoundId, position: Vec3) -> Self {
        Self {
            sound,
            position,
            attached_to: None,
            volume: 1.0,
        }
    }

    /// Play a sound that follows an object while it exists.
    pub fn attached(sound: SoundId, position: Vec3, object: ObjectId) -> Self {
        Self {
            attached_to: Some(object),
            ..Self::at(sound, position)
        }
    }

    pub fn with_volume(mut self, volume: f32) -> Self {
        self.volume = volume.clamp(0.0, 1.0);
        self
    }
}

/// Thread-safe request queue shared between the simulation and the audio thread.
#[derive(Debug, Clone, Default)]
pub struct SoundQueue {
    inner: Arc<Mutex<Vec<SoundRequest>>>,
}

impl SoundQueue {
    pub fn new() -> Self {
        Self::default()
    }

    // A panic on the other side must not take audio cues down with it.
    fn lock(&self) -> MutexGuard<'_, Vec<SoundRequest>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Queue a request. Never blocks on playback.
    pub fn push(&self, request: SoundRequest) {
        self.lock().push(request);
    }

    /// Take every pending request.
    pub fn drain(&self) -> Vec<SoundRequest> {
        std::mem::take(&mut *self.lock())
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

/// Backend that actually plays sounds.
pub trait SoundSink {
    /// Start playing a request.
    fn play(&mut self, request: &SoundRequest);

    /// Move a playing object-attached sound.
    fn move_sound(&mut self, _sound: SoundId, _object: ObjectId, _position: Vec3) {}
}

/// Sink that only logs; used by headless runs.
#[derive(Debug, Default)]
pub struct LogSink {
    pub played: u64,
}

impl SoundSink for LogSink {
    fn play(&mut self, request: &SoundRequest) {
        self.played += 1;
        log::debug!(
            "Sound {} at {:?} (volume {:.2}{})",
            request.sound,
            request.position,
            request.volume,
            request
                .attached_to
                .map(|o| format!(", attached to {}", o))
                .unwrap_or_default()
        );
    }
}

/// Playback length assumed for sounds registered without one.
pub const DEFAULT_DURATION: f32 = 1.0;

/// A sound that follows an object until it finishes playing.
#[derive(Debug, Clone, Copy)]
struct AttachedSound {
    sound: SoundId,
    object: ObjectId,
    position: Vec3,
    remaining: f32,
}

/// Tracks object-attached sounds. A sound is dropped when its playback time
/// runs out or its object is gone.
#[derive(Debug, Default)]
pub struct AttachedSounds {
    sounds: Vec<AttachedSound>,
}

impl AttachedSounds {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start tracking a request if it is attached to an object. Replaying a
    /// sound on the same object restarts it instead of stacking a copy.
    pub fn track(&mut self, request: &SoundRequest, duration: f32) {
        let Some(object) = request.attached_to else {
            return;
        };
        let entry = AttachedSound {
            sound: request.sound,
            object,
            position: request.position,
            remaining: duration.max(0.0),
        };
        match self
            .sounds
            .iter_mut()
            .find(|s| s.object == object && s.sound == request.sound)
        {
            Some(existing) => *existing = entry,
            None => self.sounds.push(entry),
        }
    }

    /// Advance playback by `dt` seconds and refresh positions from `resolve`.
    /// Finished sounds are dropped quietly; sounds whose object no longer
    /// resolves are dropped with a warning.
    pub fn update<F>(&mut self, sink: &mut dyn SoundSink, dt: f32, resolve: F)
    where
        F: Fn(ObjectId) -> Option<Vec3>,
    {
        self.sounds.retain_mut(|attached| {
            attached.remaining -= dt;
            if attached.remaining <= 0.0 {
                return false;
            }
            match resolve(attached.object) {
                Some(position) => {
                    attached.position = position;
                    sink.move_sound(attached.sound, attached.object, position);
                    true
                }
                None => {
                    log::warn!(
                        "Sound {} lost its object {}, leaving it at {:?}",
                        attached.sound,
                        attached.object,
                        attached.position
                    );
                    false
                }
            }
        });
    }

    pub fn len(&self) -> usize {
        self.sounds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sounds.is_empty()
    }
}

#[derive(Debug, Clone)]
struct SoundInfo {
    name: String,
    duration: f32,
}

/// Audio-side pump: drains the simulation's queue into a sink.
pub struct AudioSystem {
    queue: SoundQueue,
    sink: Box<dyn SoundSink + Send>,
    attached: AttachedSounds,
    sounds: HashMap<SoundId, SoundInfo>,
    master_volume: f32,
}

impl AudioSystem {
    /// Create an audio system reading from `queue`.
    pub fn new(queue: SoundQueue, sink: Box<dyn SoundSink + Send>) -> Self {
        Self {
            queue,
            sink,
            attached: AttachedSounds::new(),
            sounds: HashMap::new(),
            master_volume: 1.0,
        }
    }

    /// Associate a readable name and a playback length (seconds) with a
    /// sound id.
    pub fn register(&mut self, id: SoundId, name: &str, duration: f32) {
        let duration = if duration.is_finite() && duration > 0.0 {
            duration
        } else {
            log::warn!(
                "Sound {} ({}) has bad duration {}, using {}",
                id,
                name,
                duration,
                DEFAULT_DURATION
            );
            DEFAULT_DURATION
        };
        self.sounds.insert(
            id,
            SoundInfo {
                name: name.to_string(),
                duration,
            },
        );
    }

    pub fn name(&self, id: SoundId) -> Option<&str> {
        self.sounds.get(&id).map(|info| info.name.as_str())
    }

    /// Playback length of a sound; unregistered ids get [`DEFAULT_DURATION`].
    pub fn duration(&self, id: SoundId) -> f32 {
        self.sounds.get(&id).map_or(DEFAULT_DURATION, |info| info.duration)
    }

    /// Set master volume (0.0 to 1.0).
    pub fn set_master_volume(&mut self, volume: f32) {
        self.master_volume = volume.clamp(0.0, 1.0);
    }

    /// Drain pending requests, then advance attached sounds by `dt` seconds.
    /// Returns how many requests were played.
    pub fn pump<F>(&mut self, dt: f32, resolve: F) -> usize
    where
        F: Fn(ObjectId) -> Option<Vec3>,
    {
        self.attached.update(self.sink.as_mut(), dt, &resolve);
        let requests = self.queue.drain();
        for request in &requests {
            let scaled = request.with_volume(request.volume * self.master_volume);
            self.sink.play(&scaled);
            self.attached.track(&scaled, self.duration(request.sound));
        }
        requests.len()
    }

    pub fn attached(&self) -> &AttachedSounds {
        &self.attached
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine_core::World;

    #[derive(Default)]
    struct Recorder {
        played: Vec<SoundRequest>,
        moved: Vec<(ObjectId, Vec3)>,
    }

    impl SoundSink for Recorder {
        fn play(&mut self, request: &SoundRequest) {
            self.played.push(*request);
        }

        fn move_sound(&mut self, _sound: SoundId, object: ObjectId, position: Vec3) {
            self.moved.push((object, position));
        }
    }

    #[test]
    fn queue_is_shared_between_clones() {
        let queue = SoundQueue::new();
        let producer = queue.clone();
        producer.push(SoundRequest::at(SoundId(3), Vec3::ONE));
        assert_eq!(queue.len(), 1);
        let drained = queue.drain();
        assert_eq!(drained[0].sound, SoundId(3));
        assert!(producer.is_empty());
    }

    #[test]
    fn queue_accepts_requests_from_other_threads() {
        let queue = SoundQueue::new();
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let q = queue.clone();
                std::thread::spawn(move || q.push(SoundRequest::at(SoundId(i), Vec3::ZERO)))
            })
            .collect();
        for h in handles {
            h.join().ok();
        }
        assert_eq!(queue.len(), 4);
    }

    #[test]
    fn attached_sound_dropped_when_object_gone() {
        let mut world = World::new();
        let alive = ObjectId::from(world.spawn((0u8,)));
        let gone = ObjectId::from(world.spawn((0u8,)));

        let mut attached = AttachedSounds::new();
        attached.track(&SoundRequest::attached(SoundId(1), Vec3::ZERO, alive), 2.0);
        attached.track(&SoundRequest::attached(SoundId(2), Vec3::ZERO, gone), 2.0);
        attached.track(&SoundRequest::at(SoundId(3), Vec3::ZERO), 2.0);
        assert_eq!(attached.len(), 2);

        let mut sink = Recorder::default();
        attached.update(&mut sink, 0.1, |id| (id == alive).then_some(Vec3::X));
        assert_eq!(attached.len(), 1);
        assert_eq!(sink.moved, vec![(alive, Vec3::X)]);
    }

    #[test]
    fn attached_sound_retires_when_finished() {
        let mut world = World::new();
        let ship = ObjectId::from(world.spawn((0u8,)));
        let mut attached = AttachedSounds::new();
        attached.track(&SoundRequest::attached(SoundId(1), Vec3::ZERO, ship), 0.5);

        let mut sink = Recorder::default();
        attached.update(&mut sink, 0.25, |_| Some(Vec3::Y));
        assert_eq!(attached.len(), 1);
        attached.update(&mut sink, 0.25, |_| Some(Vec3::Y));
        assert!(attached.is_empty());
        assert_eq!(sink.moved.len(), 1);
    }

    #[test]
    fn replaying_on_same_object_restarts() {
        let mut world = World::new();
        let ship = ObjectId::from(world.spawn((0u8,)));
        let mut attached = AttachedSounds::new();
        for _ in 0..10 {
            attached.track(&SoundRequest::attached(SoundId(4), Vec3::ZERO, ship), 1.0);
        }
        attached.track(&SoundRequest::attached(SoundId(5), Vec3::ZERO, ship), 1.0);
        assert_eq!(attached.len(), 2);
    }

    #[test]
    fn one_shots_on_live_objects_do_not_pile_up() {
        let mut world = World::new();
        let queue = SoundQueue::new();
        let mut audio = AudioSystem::new(queue.clone(), Box::new(LogSink::default()));
        audio.register(SoundId(1), "laser-fire", 0.2);

        let ships: Vec<ObjectId> = (0..1000)
            .map(|_| ObjectId::from(world.spawn((0u8,))))
            .collect();
        for &ship in &ships {
            queue.push(SoundRequest::attached(SoundId(1), Vec3::ZERO, ship));
        }
        assert_eq!(audio.pump(1.0 / 30.0, |_| Some(Vec3::ZERO)), 1000);
        assert_eq!(audio.attached().len(), 1000);

        for _ in 0..10 {
            audio.pump(1.0 / 30.0, |_| Some(Vec3::ZERO));
        }
        assert!(audio.attached().is_empty());
    }

    #[test]
    fn unregistered_sound_uses_default_duration() {
        let mut audio = AudioSystem::new(SoundQueue::new(), Box::new(LogSink::default()));
        assert_eq!(audio.duration(SoundId(9)), DEFAULT_DURATION);
        audio.register(SoundId(9), "hum", f32::NAN);
        assert_eq!(audio.duration(SoundId(9)), DEFAULT_DURATION);
        assert_eq!(audio.name(SoundId(9)), Some("hum"));
    }

    #[test]
    fn volume_is_clamped() {
        let req = SoundRequest::at(SoundId(0), Vec3::ZERO).with_volume(3.0);
        assert_eq!(req.volume, 1.0);
    }
}
