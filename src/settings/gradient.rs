// SPDX-License-Identifier: GPL-3.0-or-later
use colorous::Gradient;
use serde::de::{self, Deserialize, Deserializer};

/// The colorous gradients that can be used as a palette, by name.
const GRADIENTS: &[(&str, Gradient)] = &[
    ("BLUES", colorous::BLUES),
    ("CIVIDIS", colorous::CIVIDIS),
    ("COOL", colorous::COOL),
    ("CUBEHELIX", colorous::CUBEHELIX),
    ("GREYS", colorous::GREYS),
    ("INFERNO", colorous::INFERNO),
    ("MAGMA", colorous::MAGMA),
    ("ORANGE_RED", colorous::ORANGE_RED),
    ("PLASMA", colorous::PLASMA),
    ("RAINBOW", colorous::RAINBOW),
    ("REDS", colorous::REDS),
    ("RED_BLUE", colorous::RED_BLUE),
    ("RED_YELLOW_BLUE", colorous::RED_YELLOW_BLUE),
    ("SINEBOW", colorous::SINEBOW),
    ("SPECTRAL", colorous::SPECTRAL),
    ("TURBO", colorous::TURBO),
    ("VIRIDIS", colorous::VIRIDIS),
    ("WARM", colorous::WARM),
    ("YELLOW_ORANGE_RED", colorous::YELLOW_ORANGE_RED),
];

/// Look up a gradient by name. Case is ignored, and spaces are treated as underscores.
pub(crate) fn from_str(gradient_name: &str) -> Result<Gradient, &'static str> {
    let normalized = gradient_name.to_uppercase().replace(' ', "_");
    GRADIENTS
        .iter()
        .find(|(name, _)| *name == normalized)
        .map(|(_, gradient)| *gradient)
        .ok_or("Invalid gradient name")
}

pub(crate) fn deserialize<'de, D>(deserializer: D) -> Result<Gradient, D::Error>
where
    D: Deserializer<'de>,
{
    let gradient_name: String = Deserialize::deserialize(deserializer)?;
    from_str(&gradient_name).map_err(|_| {
        de::Error::invalid_value(
            de::Unexpected::Str(&gradient_name),
            &"a name of a colorous gradient",
        )
    })
}
