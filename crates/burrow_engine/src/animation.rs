//! Animation state tables and the per-entity state machine.
//!
//! A state table maps names to ordered frame-index lists. Tables are
//! declared in JSON-like config:
//!
//! ```json
//! {
//!   "states": {
//!     "default": [0],
//!     "walk": [1, "...", 4],
//!     "blink": [0, 5, 0]
//!   },
//!   "groups": {
//!     "fidget": [
//!       { "state": "blink", "weight": 3 },
//!       { "state": "walk", "weight": 1 }
//!     ]
//!   }
//! }
//! ```
//!
//! The `"..."` sentinel expands to the inclusive integer run, so
//! `[1, "...", 4]` is `[1, 2, 3, 4]`. A group is a weighted choice
//! among declared states, drawn from the seeded session RNG.
//!
//! Tables validate every frame index against the entity's frame count
//! at parse time, so the machine can index the frame list without
//! rechecking on every tick.

use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::Arc;

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use serde::Deserialize;

use crate::error::{EngineError, EngineResult};

/// One token of a declared frame list.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum FrameToken {
    /// A literal frame index.
    Index(u32),
    /// The `"..."` run sentinel.
    Run(String),
}

/// One member of a weighted state group.
#[derive(Debug, Clone, Deserialize)]
pub struct GroupMember {
    /// Declared state name.
    pub state: String,
    /// Selection weight; probability is weight over the group total.
    pub weight: u32,
}

/// The raw, unvalidated table document.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StateTableConfig {
    /// Named frame lists.
    #[serde(default)]
    pub states: BTreeMap<String, Vec<FrameToken>>,
    /// Named weighted groups.
    #[serde(default)]
    pub groups: BTreeMap<String, Vec<GroupMember>>,
}

/// A validated state table, shared by every entity of one species.
#[derive(Debug, Default)]
pub struct StateTable {
    states: HashMap<String, Vec<usize>>,
    groups: HashMap<String, Vec<(String, u32)>>,
}

impl StateTable {
    /// Parses and validates a JSON table document against the frame
    /// count of the sprite list it will index.
    ///
    /// # Errors
    ///
    /// [`EngineError::InvalidStateTable`] on malformed JSON, empty
    /// states, unexpandable runs, out-of-range frame indices, zero
    /// weights, or group members naming undeclared states.
    pub fn from_json(json: &str, frame_count: usize) -> EngineResult<Self> {
        let config: StateTableConfig = serde_json::from_str(json)
            .map_err(|e| EngineError::InvalidStateTable(e.to_string()))?;
        Self::from_config(&config, frame_count)
    }

    /// Validates a parsed table document. See [`StateTable::from_json`].
    ///
    /// # Errors
    ///
    /// [`EngineError::InvalidStateTable`] as for `from_json`.
    pub fn from_config(config: &StateTableConfig, frame_count: usize) -> EngineResult<Self> {
        let mut states = HashMap::new();
        for (name, tokens) in &config.states {
            let frames = expand_tokens(name, tokens)?;
            if frames.is_empty() {
                return Err(EngineError::InvalidStateTable(format!(
                    "state {name:?} has no frames"
                )));
            }
            if let Some(&bad) = frames.iter().find(|&&f| f >= frame_count) {
                return Err(EngineError::InvalidStateTable(format!(
                    "state {name:?} references frame {bad}, but only {frame_count} frames exist"
                )));
            }
            states.insert(name.clone(), frames);
        }

        let mut groups = HashMap::new();
        for (name, members) in &config.groups {
            if members.is_empty() {
                return Err(EngineError::InvalidStateTable(format!(
                    "group {name:?} has no members"
                )));
            }
            let mut resolved = Vec::with_capacity(members.len());
            for member in members {
                if !states.contains_key(&member.state) {
                    return Err(EngineError::InvalidStateTable(format!(
                        "group {name:?} references undeclared state {:?}",
                        member.state
                    )));
                }
                if member.weight == 0 {
                    return Err(EngineError::InvalidStateTable(format!(
                        "group {name:?} member {:?} has zero weight",
                        member.state
                    )));
                }
                resolved.push((member.state.clone(), member.weight));
            }
            groups.insert(name.clone(), resolved);
        }

        Ok(Self { states, groups })
    }

    /// A table with a single one-frame `"default"` state, for static
    /// entities.
    #[must_use]
    pub fn single_default() -> Self {
        let mut states = HashMap::new();
        states.insert("default".to_owned(), vec![0]);
        Self {
            states,
            groups: HashMap::new(),
        }
    }

    /// Frame list of a declared state.
    #[must_use]
    pub fn frames(&self, state: &str) -> Option<&[usize]> {
        self.states.get(state).map(Vec::as_slice)
    }

    /// True when `name` names a state or a group.
    #[must_use]
    pub fn declares(&self, name: &str) -> bool {
        self.states.contains_key(name) || self.groups.contains_key(name)
    }

    /// Resolves `name` to a concrete state: a state name maps to
    /// itself, a group name picks a member weighted by the RNG.
    #[must_use]
    pub fn resolve<'a>(&'a self, name: &'a str, rng: &mut ChaCha8Rng) -> Option<&'a str> {
        if self.states.contains_key(name) {
            return Some(name);
        }
        let members = self.groups.get(name)?;
        let total: u32 = members.iter().map(|(_, w)| w).sum();
        let mut roll = rng.gen_range(0..total);
        for (state, weight) in members {
            if roll < *weight {
                return Some(state);
            }
            roll -= weight;
        }
        // Unreachable with validated weights.
        members.last().map(|(state, _)| state.as_str())
    }
}

fn expand_tokens(name: &str, tokens: &[FrameToken]) -> EngineResult<Vec<usize>> {
    let mut frames = Vec::with_capacity(tokens.len());
    let mut i = 0;
    while i < tokens.len() {
        match &tokens[i] {
            FrameToken::Index(index) => frames.push(*index as usize),
            FrameToken::Run(sentinel) => {
                if sentinel != "..." {
                    return Err(EngineError::InvalidStateTable(format!(
                        "state {name:?} contains unknown token {sentinel:?}"
                    )));
                }
                let start = frames.last().copied().ok_or_else(|| {
                    EngineError::InvalidStateTable(format!(
                        "state {name:?} starts with a \"...\" run"
                    ))
                })?;
                let end = match tokens.get(i + 1) {
                    Some(FrameToken::Index(end)) => *end as usize,
                    _ => {
                        return Err(EngineError::InvalidStateTable(format!(
                            "state {name:?} has a \"...\" run without an end index"
                        )))
                    }
                };
                if end < start {
                    return Err(EngineError::InvalidStateTable(format!(
                        "state {name:?} declares a descending run {start}..{end}"
                    )));
                }
                frames.extend(start + 1..=end);
                i += 1;
            }
        }
        i += 1;
    }
    Ok(frames)
}

/// A queued state activation.
#[derive(Debug, Clone)]
struct QueuedState {
    name: String,
    tag: Option<String>,
}

/// A completed activation, reported to the session event queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletedState {
    /// The state that finished.
    pub state: String,
    /// The tag attached when it was set or queued.
    pub tag: Option<String>,
}

/// The per-entity animation state machine.
///
/// Owns the current activation (state name, frame cursor, completion
/// flag, completion tag) and the pending queue. The shared table is
/// immutable.
#[derive(Debug)]
pub struct AnimationStateMachine {
    table: Arc<StateTable>,
    current: Option<String>,
    cursor: usize,
    completed: bool,
    tag: Option<String>,
    queue: VecDeque<QueuedState>,
}

impl AnimationStateMachine {
    /// Creates a machine over a shared table with no active state.
    #[must_use]
    pub fn new(table: Arc<StateTable>) -> Self {
        Self {
            table,
            current: None,
            cursor: 0,
            completed: false,
            tag: None,
            queue: VecDeque::new(),
        }
    }

    /// Creates a machine already in `state`, falling back to inactive
    /// (with a log line) when the state is undeclared.
    #[must_use]
    pub fn starting_in(table: Arc<StateTable>, state: &str, rng: &mut ChaCha8Rng) -> Self {
        let mut machine = Self::new(table);
        if let Err(err) = machine.set_state(state, None, rng) {
            tracing::warn!(%err, "initial animation state rejected");
        }
        machine
    }

    /// Name of the active state, if any.
    #[must_use]
    pub fn current_state(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// Frame index into the entity's sprite list for the active
    /// state, or 0 when inactive.
    #[must_use]
    pub fn frame_index(&self) -> usize {
        self.current
            .as_deref()
            .and_then(|state| self.table.frames(state))
            .and_then(|frames| frames.get(self.cursor).copied())
            .unwrap_or(0)
    }

    /// True when the active state has run its frame list to the end
    /// (or nothing is active).
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.current.is_none() || self.completed
    }

    /// Activates `name` (a state or group), resetting the frame
    /// cursor and completion flag.
    ///
    /// # Errors
    ///
    /// [`EngineError::UnknownState`] when `name` is not declared.
    /// The machine is left unchanged in that case.
    pub fn set_state(
        &mut self,
        name: &str,
        tag: Option<String>,
        rng: &mut ChaCha8Rng,
    ) -> EngineResult<()> {
        let resolved = self
            .table
            .resolve(name, rng)
            .ok_or_else(|| EngineError::UnknownState(name.to_owned()))?
            .to_owned();
        self.current = Some(resolved);
        self.cursor = 0;
        self.completed = false;
        self.tag = tag;
        Ok(())
    }

    /// Appends a state to the pending queue. An idle machine starts
    /// it immediately.
    ///
    /// # Errors
    ///
    /// [`EngineError::UnknownState`] when `name` is not declared;
    /// nothing is queued in that case.
    pub fn queue_state(
        &mut self,
        name: &str,
        tag: Option<String>,
        rng: &mut ChaCha8Rng,
    ) -> EngineResult<()> {
        if !self.table.declares(name) {
            return Err(EngineError::UnknownState(name.to_owned()));
        }
        self.queue.push_back(QueuedState {
            name: name.to_owned(),
            tag,
        });
        if self.is_idle() {
            self.pop_queue(rng);
        }
        Ok(())
    }

    /// Advances one tick of animation.
    ///
    /// Single-frame states with an empty queue do nothing. On
    /// wraparound the activation is marked completed exactly once
    /// (returning the completion record) and the next queued state,
    /// if any, begins.
    pub fn advance_frame(&mut self, rng: &mut ChaCha8Rng) -> Option<CompletedState> {
        let current = self.current.clone()?;
        let frame_count = self.table.frames(&current).map_or(0, <[usize]>::len);
        if frame_count == 0 {
            return None;
        }
        if frame_count <= 1 && self.queue.is_empty() {
            return None;
        }

        self.cursor += 1;
        if self.cursor < frame_count {
            return None;
        }

        // Wraparound: back to frame 0, completion fires once, then
        // any queued state takes over.
        self.cursor = 0;
        let completion = if self.completed {
            None
        } else {
            self.completed = true;
            Some(CompletedState {
                state: current,
                tag: self.tag.take(),
            })
        };

        if !self.queue.is_empty() {
            self.pop_queue(rng);
        }

        completion
    }

    /// Starts the next queued state. Undeclared names (tables can be
    /// reloaded out from under a queue) are logged and skipped rather
    /// than poisoning the tick.
    fn pop_queue(&mut self, rng: &mut ChaCha8Rng) {
        while let Some(next) = self.queue.pop_front() {
            match self.set_state(&next.name, next.tag, rng) {
                Ok(()) => return,
                Err(err) => {
                    tracing::warn!(state = %next.name, %err, "skipping undeclared queued state");
                }
            }
        }
    }
}
