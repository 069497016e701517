//! Bot move sources. A bot seat is an ordinary player actor whose presses
//! come from a feeder task instead of the keyboard.

pub(crate) mod feeder;

pub(crate) use feeder::BotFeeder;
