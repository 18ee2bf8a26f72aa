//! Night palette shared by the backdrop, the effects and the windows.

use crate::render::Rgba;

pub const SKY_TOP: Rgba = Rgba::hex(0x0a0520);
pub const SKY_MID: Rgba = Rgba::hex(0x1a1a3e);
pub const SKY_HORIZON: Rgba = Rgba::hex(0x2d1b4e);

pub const BUILDING_MAIN: Rgba = Rgba::hex(0x2a2a2a);
pub const BUILDING_SHADOW: Rgba = Rgba::hex(0x1a1a1a);
pub const BUILDING_FRAME: Rgba = Rgba::hex(0x404040);

pub const LIGHT_PRIMARY: Rgba = Rgba::hex(0xffe5b4);
pub const LIGHT_WARM: Rgba = Rgba::hex(0xffd699);
pub const LIGHT_COOL: Rgba = Rgba::hex(0xfff5e6);
pub const TV_GLOW: Rgba = Rgba::hex(0x4d94ff);

pub const CITYSCAPE: Rgba = Rgba::hex(0x0f0f0f);

pub const UFO_BEAM: Rgba = Rgba::hex(0x9fffe6);
pub const POLICE_RED: Rgba = Rgba::hex(0xff3333);
pub const POLICE_BLUE: Rgba = Rgba::hex(0x3366ff);
pub const LIGHTNING: Rgba = Rgba::hex(0xffffff);
pub const SPOTLIGHT: Rgba = Rgba::hex(0xffffcc);

pub const WHITE: Rgba = Rgba::rgb(255, 255, 255);
pub const GREY: Rgba = Rgba::hex(0x808080);
pub const SILVER: Rgba = Rgba::hex(0xc0c0c0);
