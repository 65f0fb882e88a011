//! Operator-facing console text.

use crate::dispatch::SessionState;

/// Usage banner printed once at startup.
pub const USAGE: &str = r#"

Reading from the keyboard and Publishing to Twist!
---------------------------
Moving around:
   u    i    o
   j    k    l
   m    ,    .

For Holonomic mode (strafing), hold down the shift key:
---------------------------
   U    I    O
   J    K    L
   M    <    >

t : up (+z)
b : down (-z)

anything else : stop

q/z : increase/decrease max speeds by 10%
w/x : increase/decrease only linear speed by 10%
e/c : increase/decrease only angular speed by 10%

Rest = a
Trot = s
Crawl = d
Stand = f

CTRL-C to quit




"#;

/// Printed after the interrupt key, right before exit.
pub const FAREWELL: &str = "\n\n                 .     .\n              .  |\\-^-/|  .    \n             /| } O.=.O { |\\\n\n                 CH3EERS\n\n";

/// Status line shown before the first key.
pub fn awaiting(state: &SessionState) -> String {
    format!(
        "\rCurrent: speed {:.6}\tturn {:.6} | Awaiting command...\r",
        state.speed, state.turn
    )
}

/// Status line after a bound key.
pub fn last_command(state: &SessionState, key: char) -> String {
    format!(
        "\rCurrent: speed {:.6}\tturn {:.6} | Last command: {}   ",
        state.speed,
        state.turn,
        printable(key)
    )
}

/// Status line after an unbound key.
pub fn invalid_command(state: &SessionState, key: char) -> String {
    format!(
        "\rCurrent: speed {:.6}\tturn {:.6} | Invalid command! {}",
        state.speed,
        state.turn,
        printable(key)
    )
}

// Control characters would move the cursor or clear the line.
fn printable(key: char) -> String {
    if key.is_control() {
        key.escape_default().to_string()
    } else {
        key.to_string()
    }
}
