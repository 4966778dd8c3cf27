// Per-channel operation objects for the Gen1 dialect.
//
// Operations encode as query parameters on the channel path. Turn
// values are the literal strings `on`, `off`, `toggle`; durations are
// seconds.

use crate::error::Error;
use crate::gen1::Gen1Client;
use crate::gen1::models::{Gen1LightStatus, Gen1RelayStatus, Gen1RollerStatus};

/// The `turn` parameter of relay/light/color channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum Turn {
    On,
    Off,
    Toggle,
}

/// The `go` parameter of roller channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum RollerGo {
    Open,
    Close,
    Stop,
    ToPos,
}

fn check_id(kind: &str, id: i64) -> Result<i64, Error> {
    if id < 0 {
        Err(Error::InvalidComponentId { id }.with_component(kind, id))
    } else {
        Ok(id)
    }
}

fn fmt_seconds(secs: f64) -> String {
    // Gen1 firmware takes integer seconds; fractional values round up
    // so a short timer never becomes "no timer".
    let rounded = secs.ceil().max(0.0);
    format!("{rounded:.0}")
}

// ── Relay ───────────────────────────────────────────────────────────

const RELAY: &str = "relay";

/// Operations on one relay channel (`/relay/<id>`).
#[derive(Clone, Copy)]
pub struct Relay<'a> {
    client: &'a Gen1Client,
    id: i64,
}

impl<'a> Relay<'a> {
    pub(crate) fn new(client: &'a Gen1Client, id: i64) -> Self {
        Self { client, id }
    }

    /// `GET /relay/<id>` with no parameters.
    pub async fn status(&self) -> Result<Gen1RelayStatus, Error> {
        let id = check_id(RELAY, self.id)?;
        self.client
            .get_json(&format!("relay/{id}"), &[])
            .await
            .map_err(|e| e.with_component(RELAY, id))
    }

    /// `GET /relay/<id>?turn=...&timer=...`.
    pub async fn turn(&self, turn: Turn, timer: Option<f64>) -> Result<Gen1RelayStatus, Error> {
        let id = check_id(RELAY, self.id)?;
        let mut query = vec![("turn", turn.to_string())];
        if let Some(secs) = timer {
            query.push(("timer", fmt_seconds(secs)));
        }
        self.client
            .get_json(&format!("relay/{id}"), &query)
            .await
            .map_err(|e| e.with_component(RELAY, id))
    }

    pub async fn on(&self) -> Result<Gen1RelayStatus, Error> {
        self.turn(Turn::On, None).await
    }

    pub async fn off(&self) -> Result<Gen1RelayStatus, Error> {
        self.turn(Turn::Off, None).await
    }

    pub async fn toggle(&self) -> Result<Gen1RelayStatus, Error> {
        self.turn(Turn::Toggle, None).await
    }

    /// Turn on, reverting after `seconds` (the `timer` parameter).
    pub async fn turn_on_for(&self, seconds: f64) -> Result<Gen1RelayStatus, Error> {
        self.turn(Turn::On, Some(seconds)).await
    }

    /// Turn off, reverting after `seconds`.
    pub async fn turn_off_for(&self, seconds: f64) -> Result<Gen1RelayStatus, Error> {
        self.turn(Turn::Off, Some(seconds)).await
    }
}

// ── Roller ──────────────────────────────────────────────────────────

const ROLLER: &str = "roller";

/// Operations on one roller channel (`/roller/<id>`).
#[derive(Clone, Copy)]
pub struct Roller<'a> {
    client: &'a Gen1Client,
    id: i64,
}

impl<'a> Roller<'a> {
    pub(crate) fn new(client: &'a Gen1Client, id: i64) -> Self {
        Self { client, id }
    }

    /// `GET /roller/<id>` with no parameters.
    pub async fn status(&self) -> Result<Gen1RollerStatus, Error> {
        let id = check_id(ROLLER, self.id)?;
        self.client
            .get_json(&format!("roller/{id}"), &[])
            .await
            .map_err(|e| e.with_component(ROLLER, id))
    }

    /// `GET /roller/<id>?go=...&duration=...`.
    pub async fn go(
        &self,
        direction: RollerGo,
        duration: Option<f64>,
    ) -> Result<Gen1RollerStatus, Error> {
        let id = check_id(ROLLER, self.id)?;
        let mut query = vec![("go", direction.to_string())];
        if let Some(secs) = duration {
            query.push(("duration", fmt_seconds(secs)));
        }
        self.client
            .get_json(&format!("roller/{id}"), &query)
            .await
            .map_err(|e| e.with_component(ROLLER, id))
    }

    pub async fn open(&self, duration: Option<f64>) -> Result<Gen1RollerStatus, Error> {
        self.go(RollerGo::Open, duration).await
    }

    pub async fn close(&self, duration: Option<f64>) -> Result<Gen1RollerStatus, Error> {
        self.go(RollerGo::Close, duration).await
    }

    pub async fn stop(&self) -> Result<Gen1RollerStatus, Error> {
        self.go(RollerGo::Stop, None).await
    }

    /// `GET /roller/<id>?go=to_pos&roller_pos=<0..100>`.
    pub async fn go_to_position(&self, pos: u8) -> Result<Gen1RollerStatus, Error> {
        let id = check_id(ROLLER, self.id)?;
        let query = [
            ("go", RollerGo::ToPos.to_string()),
            ("roller_pos", pos.to_string()),
        ];
        self.client
            .get_json(&format!("roller/{id}"), &query)
            .await
            .map_err(|e| e.with_component(ROLLER, id))
    }
}

// ── Light ───────────────────────────────────────────────────────────

const LIGHT: &str = "light";

/// Optional fields for a light write. Only present fields are sent;
/// adjusting brightness without an explicit turn implies `turn=on`.
#[derive(Debug, Clone, Default)]
pub struct Gen1LightSet {
    pub turn: Option<Turn>,
    /// 0–100.
    pub brightness: Option<u8>,
    /// Transition time in milliseconds.
    pub transition: Option<u64>,
    /// Flip-back timer in seconds.
    pub timer: Option<f64>,
}

/// Operations on one white-light channel (`/light/<id>`).
#[derive(Clone, Copy)]
pub struct Gen1Light<'a> {
    client: &'a Gen1Client,
    id: i64,
}

impl<'a> Gen1Light<'a> {
    pub(crate) fn new(client: &'a Gen1Client, id: i64) -> Self {
        Self { client, id }
    }

    pub async fn status(&self) -> Result<Gen1LightStatus, Error> {
        let id = check_id(LIGHT, self.id)?;
        self.client
            .get_json(&format!("light/{id}"), &[])
            .await
            .map_err(|e| e.with_component(LIGHT, id))
    }

    pub async fn set(&self, opts: &Gen1LightSet) -> Result<Gen1LightStatus, Error> {
        let id = check_id(LIGHT, self.id)?;
        let mut query: Vec<(&str, String)> = Vec::new();

        let turn = opts.turn.or({
            if opts.brightness.is_some() { Some(Turn::On) } else { None }
        });
        if let Some(turn) = turn {
            query.push(("turn", turn.to_string()));
        }
        if let Some(b) = opts.brightness {
            query.push(("brightness", b.to_string()));
        }
        if let Some(ms) = opts.transition {
            query.push(("transition", ms.to_string()));
        }
        if let Some(secs) = opts.timer {
            query.push(("timer", fmt_seconds(secs)));
        }

        self.client
            .get_json(&format!("light/{id}"), &query)
            .await
            .map_err(|e| e.with_component(LIGHT, id))
    }

    pub async fn on(&self) -> Result<Gen1LightStatus, Error> {
        self.set(&Gen1LightSet {
            turn: Some(Turn::On),
            ..Gen1LightSet::default()
        })
        .await
    }

    pub async fn off(&self) -> Result<Gen1LightStatus, Error> {
        self.set(&Gen1LightSet {
            turn: Some(Turn::Off),
            ..Gen1LightSet::default()
        })
        .await
    }

    pub async fn toggle(&self) -> Result<Gen1LightStatus, Error> {
        self.set(&Gen1LightSet {
            turn: Some(Turn::Toggle),
            ..Gen1LightSet::default()
        })
        .await
    }

    pub async fn set_brightness(&self, brightness: u8) -> Result<Gen1LightStatus, Error> {
        self.set(&Gen1LightSet {
            brightness: Some(brightness),
            ..Gen1LightSet::default()
        })
        .await
    }
}

// ── Color ───────────────────────────────────────────────────────────

const COLOR: &str = "color";

/// Optional fields for a color write (`/color/<id>`).
#[derive(Debug, Clone, Default)]
pub struct ColorSet {
    pub turn: Option<Turn>,
    pub red: Option<u8>,
    pub green: Option<u8>,
    pub blue: Option<u8>,
    /// White channel, 0–255.
    pub white: Option<u8>,
    /// Overall gain, 0–100.
    pub gain: Option<u8>,
    pub timer: Option<f64>,
}

/// Operations on one color channel (`/color/<id>`).
#[derive(Clone, Copy)]
pub struct Color<'a> {
    client: &'a Gen1Client,
    id: i64,
}

impl<'a> Color<'a> {
    pub(crate) fn new(client: &'a Gen1Client, id: i64) -> Self {
        Self { client, id }
    }

    pub async fn status(&self) -> Result<Gen1LightStatus, Error> {
        let id = check_id(COLOR, self.id)?;
        self.client
            .get_json(&format!("color/{id}"), &[])
            .await
            .map_err(|e| e.with_component(COLOR, id))
    }

    pub async fn set(&self, opts: &ColorSet) -> Result<Gen1LightStatus, Error> {
        let id = check_id(COLOR, self.id)?;
        let mut query: Vec<(&str, String)> = Vec::new();

        let adjusting = opts.red.is_some()
            || opts.green.is_some()
            || opts.blue.is_some()
            || opts.white.is_some()
            || opts.gain.is_some();
        let turn = opts.turn.or(adjusting.then_some(Turn::On));
        if let Some(turn) = turn {
            query.push(("turn", turn.to_string()));
        }
        for (key, value) in [
            ("red", opts.red),
            ("green", opts.green),
            ("blue", opts.blue),
            ("white", opts.white),
            ("gain", opts.gain),
        ] {
            if let Some(v) = value {
                query.push((key, v.to_string()));
            }
        }
        if let Some(secs) = opts.timer {
            query.push(("timer", fmt_seconds(secs)));
        }

        self.client
            .get_json(&format!("color/{id}"), &query)
            .await
            .map_err(|e| e.with_component(COLOR, id))
    }

    pub async fn set_color(&self, r: u8, g: u8, b: u8) -> Result<Gen1LightStatus, Error> {
        self.set(&ColorSet {
            red: Some(r),
            green: Some(g),
            blue: Some(b),
            ..ColorSet::default()
        })
        .await
    }

    pub async fn on(&self) -> Result<Gen1LightStatus, Error> {
        self.set(&ColorSet {
            turn: Some(Turn::On),
            ..ColorSet::default()
        })
        .await
    }

    pub async fn off(&self) -> Result<Gen1LightStatus, Error> {
        self.set(&ColorSet {
            turn: Some(Turn::Off),
            ..ColorSet::default()
        })
        .await
    }
}

// ── White ───────────────────────────────────────────────────────────

const WHITE: &str = "white";

/// Operations on one white-only channel (`/white/<id>`).
#[derive(Clone, Copy)]
pub struct White<'a> {
    client: &'a Gen1Client,
    id: i64,
}

impl<'a> White<'a> {
    pub(crate) fn new(client: &'a Gen1Client, id: i64) -> Self {
        Self { client, id }
    }

    pub async fn status(&self) -> Result<Gen1LightStatus, Error> {
        let id = check_id(WHITE, self.id)?;
        self.client
            .get_json(&format!("white/{id}"), &[])
            .await
            .map_err(|e| e.with_component(WHITE, id))
    }

    /// `GET /white/<id>?turn=...&brightness=...`.
    pub async fn set(
        &self,
        turn: Option<Turn>,
        brightness: Option<u8>,
    ) -> Result<Gen1LightStatus, Error> {
        let id = check_id(WHITE, self.id)?;
        let mut query: Vec<(&str, String)> = Vec::new();

        let turn = turn.or({
            if brightness.is_some() { Some(Turn::On) } else { None }
        });
        if let Some(turn) = turn {
            query.push(("turn", turn.to_string()));
        }
        if let Some(b) = brightness {
            query.push(("brightness", b.to_string()));
        }

        self.client
            .get_json(&format!("white/{id}"), &query)
            .await
            .map_err(|e| e.with_component(WHITE, id))
    }
}
