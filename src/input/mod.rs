//! Keyboard and pointer input, translated into fishing commands during PreUpdate.

use bevy::prelude::*;

use crate::config::FishingConfig;
use crate::shared::*;

pub struct InputPlugin;

impl Plugin for InputPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            PreUpdate,
            (reset_and_read_input, dispatch_commands, toggle_pause).chain(),
        );
    }
}

const LETTERS: [(KeyCode, char); 26] = [
    (KeyCode::KeyA, 'A'),
    (KeyCode::KeyB, 'B'),
    (KeyCode::KeyC, 'C'),
    (KeyCode::KeyD, 'D'),
    (KeyCode::KeyE, 'E'),
    (KeyCode::KeyF, 'F'),
    (KeyCode::KeyG, 'G'),
    (KeyCode::KeyH, 'H'),
    (KeyCode::KeyI, 'I'),
    (KeyCode::KeyJ, 'J'),
    (KeyCode::KeyK, 'K'),
    (KeyCode::KeyL, 'L'),
    (KeyCode::KeyM, 'M'),
    (KeyCode::KeyN, 'N'),
    (KeyCode::KeyO, 'O'),
    (KeyCode::KeyP, 'P'),
    (KeyCode::KeyQ, 'Q'),
    (KeyCode::KeyR, 'R'),
    (KeyCode::KeyS, 'S'),
    (KeyCode::KeyT, 'T'),
    (KeyCode::KeyU, 'U'),
    (KeyCode::KeyV, 'V'),
    (KeyCode::KeyW, 'W'),
    (KeyCode::KeyX, 'X'),
    (KeyCode::KeyY, 'Y'),
    (KeyCode::KeyZ, 'Z'),
];

/// Letter for an A-Z key.
pub fn key_to_letter(key: KeyCode) -> Option<char> {
    LETTERS.iter().find(|(k, _)| *k == key).map(|(_, c)| *c)
}

/// Key for a letter, either case.
pub fn letter_to_key(letter: char) -> Option<KeyCode> {
    let letter = letter.to_ascii_uppercase();
    LETTERS.iter().find(|(_, c)| *c == letter).map(|(k, _)| *k)
}

/// The single point where raw input events become game actions.
fn reset_and_read_input(
    mut pointer_events: EventReader<PointerMovedEvent>,
    mut key_events: EventReader<KeyPressEvent>,
    bindings: Res<KeyBindings>,
    context: Res<InputContext>,
    mut input: ResMut<PlayerInput>,
) {
    let pointer = input.pointer;
    *input = PlayerInput {
        pointer,
        ..PlayerInput::default()
    };

    if let Some(last) = pointer_events.read().last() {
        input.pointer = Some(last.position);
    }

    for event in key_events.read() {
        let key = event.key;
        let letter = key_to_letter(key);

        if *context == InputContext::Typing {
            if let Some(c) = letter {
                input.letters.push(c);
                continue;
            }
        }

        if key == bindings.cast {
            input.cast = true;
        } else if key == bindings.start_reeling {
            input.start_reeling = true;
        } else if key == bindings.reset_bait {
            input.reset_bait = true;
        } else if key == bindings.pause {
            input.pause = true;
        } else if key == bindings.generator {
            input.generator = true;
        }
    }
}

fn dispatch_commands(
    input: Res<PlayerInput>,
    config: Res<FishingConfig>,
    mut cast: EventWriter<CastCommand>,
    mut start_reeling: EventWriter<StartReelingCommand>,
    mut reset: EventWriter<ResetBaitCommand>,
    mut qte_press: EventWriter<QtePressCommand>,
) {
    if input.cast {
        cast.send(CastCommand {
            direction: config.bait.default_cast_direction(),
            force: config.bait.cast_force,
        });
    }
    if input.start_reeling {
        start_reeling.send(StartReelingCommand);
    }
    if input.reset_bait {
        reset.send(ResetBaitCommand);
    }
    if input.generator {
        qte_press.send(QtePressCommand);
    }
}

fn toggle_pause(
    input: Res<PlayerInput>,
    state: Res<State<GameState>>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    if !input.pause {
        return;
    }
    match state.get() {
        GameState::Playing => next_state.set(GameState::Paused),
        GameState::Paused => next_state.set(GameState::Playing),
        GameState::Loading => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_letter_keys_map_to_uppercase() {
        assert_eq!(key_to_letter(KeyCode::KeyA), Some('A'));
        assert_eq!(key_to_letter(KeyCode::KeyZ), Some('Z'));
        assert_eq!(key_to_letter(KeyCode::Space), None);
        assert_eq!(key_to_letter(KeyCode::Digit1), None);
    }

    #[test]
    fn test_letter_to_key_accepts_either_case() {
        assert_eq!(letter_to_key('f'), Some(KeyCode::KeyF));
        assert_eq!(letter_to_key('F'), Some(KeyCode::KeyF));
        assert_eq!(letter_to_key('1'), None);
    }
}
