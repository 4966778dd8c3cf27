// ── Command routing ──
//
// Maps the normalized `Command` surface onto dialect-specific calls.
// Gen2 routes by canonical kind; Gen1 dispatches through its channel
// names (switch → relay, cover → roller, rgb/rgbw → color). Observable
// behavior is identical where both dialects support an operation.

use shellfly_api::gen1::Gen1Client;
use shellfly_api::gen1::components::{ColorSet, Turn};
use shellfly_api::gen2::Gen2Client;
use shellfly_api::{ComponentKind, Generation, ShellyClient};

use crate::command::Command;
use crate::error::CoreError;

pub(crate) async fn route_command(client: &ShellyClient, cmd: &Command) -> Result<(), CoreError> {
    match client {
        ShellyClient::Gen1(gen1) => route_gen1(gen1, cmd).await,
        ShellyClient::Gen2(gen2) => route_gen2(gen2, cmd).await,
    }
}

fn unsupported(cmd: &Command, generation: Generation) -> CoreError {
    CoreError::Unsupported {
        operation: cmd.to_string(),
        generation: generation.to_string(),
    }
}

// ── Gen2 ────────────────────────────────────────────────────────────

async fn route_gen2(client: &Gen2Client, cmd: &Command) -> Result<(), CoreError> {
    match cmd {
        Command::Toggle { key } => {
            let id = i64::from(key.index);
            match key.kind {
                ComponentKind::Switch => {
                    client.switch(id).toggle().await?;
                }
                ComponentKind::Light => {
                    client.light(id).toggle().await?;
                }
                ComponentKind::Rgb => {
                    client.rgb(id).toggle().await?;
                }
                ComponentKind::Rgbw => {
                    client.rgbw(id).toggle().await?;
                }
                ComponentKind::Cover | ComponentKind::Input => {
                    return Err(unsupported(cmd, Generation::Gen2));
                }
            }
        }
        Command::TurnOn { key } => set_output_gen2(client, cmd, key.kind, key.index, true).await?,
        Command::TurnOff { key } => {
            set_output_gen2(client, cmd, key.kind, key.index, false).await?;
        }
        Command::OpenCover { id, duration } => {
            client.cover(i64::from(*id)).open(*duration).await?;
        }
        Command::CloseCover { id, duration } => {
            client.cover(i64::from(*id)).close(*duration).await?;
        }
        Command::StopCover { id } => client.cover(i64::from(*id)).stop().await?,
        Command::SetPosition { id, pos } => {
            client.cover(i64::from(*id)).go_to_position(*pos).await?;
        }
        Command::SetBrightness { key, brightness } => {
            let id = i64::from(key.index);
            match key.kind {
                ComponentKind::Light => client.light(id).set_brightness(*brightness).await?,
                ComponentKind::Rgb => client.rgb(id).set_brightness(*brightness).await?,
                ComponentKind::Rgbw => {
                    client
                        .rgbw(id)
                        .set(&shellfly_api::gen2::components::RgbwSet {
                            brightness: Some(*brightness),
                            ..Default::default()
                        })
                        .await?;
                }
                _ => return Err(unsupported(cmd, Generation::Gen2)),
            }
        }
        Command::SetColor { key, rgb } => {
            let id = i64::from(key.index);
            match key.kind {
                ComponentKind::Rgb => client.rgb(id).set_color(rgb[0], rgb[1], rgb[2]).await?,
                ComponentKind::Rgbw => {
                    client.rgbw(id).set_color(rgb[0], rgb[1], rgb[2]).await?;
                }
                _ => return Err(unsupported(cmd, Generation::Gen2)),
            }
        }
        Command::SetWhite { id, white } => {
            client.rgbw(i64::from(*id)).set_white(*white).await?;
        }
        Command::SetThermostatTarget { id, target_c } => {
            client.thermostat(i64::from(*id)).set_target(*target_c).await?;
        }
        Command::Reboot { delay_ms } => client.reboot(*delay_ms).await?,
    }
    Ok(())
}

async fn set_output_gen2(
    client: &Gen2Client,
    cmd: &Command,
    kind: ComponentKind,
    index: u32,
    on: bool,
) -> Result<(), CoreError> {
    let id = i64::from(index);
    match kind {
        ComponentKind::Switch => {
            client.switch(id).set(on).await?;
        }
        ComponentKind::Light => {
            if on {
                client.light(id).on().await?;
            } else {
                client.light(id).off().await?;
            }
        }
        ComponentKind::Rgb => {
            if on {
                client.rgb(id).on().await?;
            } else {
                client.rgb(id).off().await?;
            }
        }
        ComponentKind::Rgbw => {
            if on {
                client.rgbw(id).on().await?;
            } else {
                client.rgbw(id).off().await?;
            }
        }
        ComponentKind::Cover | ComponentKind::Input => {
            return Err(unsupported(cmd, Generation::Gen2));
        }
    }
    Ok(())
}

// ── Gen1 ────────────────────────────────────────────────────────────

async fn route_gen1(client: &Gen1Client, cmd: &Command) -> Result<(), CoreError> {
    match cmd {
        Command::Toggle { key } => turn_gen1(client, cmd, key.kind, key.index, Turn::Toggle).await?,
        Command::TurnOn { key } => turn_gen1(client, cmd, key.kind, key.index, Turn::On).await?,
        Command::TurnOff { key } => turn_gen1(client, cmd, key.kind, key.index, Turn::Off).await?,
        Command::OpenCover { id, duration } => {
            client.roller(i64::from(*id)).open(*duration).await?;
        }
        Command::CloseCover { id, duration } => {
            client.roller(i64::from(*id)).close(*duration).await?;
        }
        Command::StopCover { id } => {
            client.roller(i64::from(*id)).stop().await?;
        }
        Command::SetPosition { id, pos } => {
            client.roller(i64::from(*id)).go_to_position(*pos).await?;
        }
        Command::SetBrightness { key, brightness } => {
            let id = i64::from(key.index);
            match key.kind {
                ComponentKind::Light => {
                    client.light(id).set_brightness(*brightness).await?;
                }
                // Color channels express overall brightness as gain.
                ComponentKind::Rgb | ComponentKind::Rgbw => {
                    client
                        .color(id)
                        .set(&ColorSet {
                            gain: Some(*brightness),
                            ..ColorSet::default()
                        })
                        .await?;
                }
                _ => return Err(unsupported(cmd, Generation::Gen1)),
            }
        }
        Command::SetColor { key, rgb } => {
            let id = i64::from(key.index);
            match key.kind {
                ComponentKind::Rgb | ComponentKind::Rgbw => {
                    client.color(id).set_color(rgb[0], rgb[1], rgb[2]).await?;
                }
                _ => return Err(unsupported(cmd, Generation::Gen1)),
            }
        }
        Command::SetWhite { id, white } => {
            // Normalized white is 0–100; the gen1 color channel is 0–255.
            client
                .color(i64::from(*id))
                .set(&ColorSet {
                    white: Some(percent_to_byte(*white)),
                    ..ColorSet::default()
                })
                .await?;
        }
        Command::SetThermostatTarget { .. } => {
            return Err(unsupported(cmd, Generation::Gen1));
        }
        Command::Reboot { .. } => client.reboot().await?,
    }
    Ok(())
}

async fn turn_gen1(
    client: &Gen1Client,
    cmd: &Command,
    kind: ComponentKind,
    index: u32,
    turn: Turn,
) -> Result<(), CoreError> {
    let id = i64::from(index);
    match kind {
        ComponentKind::Switch => {
            client.relay(id).turn(turn, None).await?;
        }
        ComponentKind::Light => {
            client
                .light(id)
                .set(&shellfly_api::gen1::components::Gen1LightSet {
                    turn: Some(turn),
                    ..Default::default()
                })
                .await?;
        }
        ComponentKind::Rgb | ComponentKind::Rgbw => {
            client
                .color(id)
                .set(&ColorSet {
                    turn: Some(turn),
                    ..ColorSet::default()
                })
                .await?;
        }
        ComponentKind::Cover | ComponentKind::Input => {
            return Err(unsupported(cmd, Generation::Gen1));
        }
    }
    Ok(())
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn percent_to_byte(percent: u8) -> u8 {
    ((f64::from(percent.min(100)) * 255.0) / 100.0).round() as u8
}
