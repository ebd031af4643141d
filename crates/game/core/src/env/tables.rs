//! Balance tables: per-form base stats, progression factors, and target,
//! player and controller tuning.
//!
//! Every struct has an in-code default so a partially filled `balance.toml`
//! only overrides the values it names.

/// Oracle providing balance tables.
///
/// Entity data (notes, tier rules, loot tables) is not part of this oracle;
/// those are plain values owned by the session.
pub trait TablesOracle: Send + Sync {
    fn projectile(&self) -> ProjectileSettings;
    fn area(&self) -> AreaSettings;
    fn beam(&self) -> BeamSettings;
    fn buff(&self) -> BuffSettings;
    fn progression(&self) -> ProgressionRules;
    fn target_rules(&self) -> TargetRules;
    fn player_rules(&self) -> PlayerRules;
    fn controller_rules(&self) -> ControllerRules;
}

/// Slow applied by a delivery form when its effect is `Slow`.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SlowSpec {
    pub percent: f32,
    pub duration: f32,
}

impl SlowSpec {
    pub const fn new(percent: f32, duration: f32) -> Self {
        Self { percent, duration }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ProjectileSettings {
    pub power: f32,
    pub speed: f32,
    /// Collision radius of one projectile.
    pub size: f32,
    pub duration: f32,
    /// Heading turn rate (radians per second) while outside the terminal radius.
    pub turn_speed: f32,
    pub hit_threshold: f32,
    pub terminal_distance: f32,
    /// Delay between sequential burst spawns.
    pub burst_spacing: f32,
    pub slow: SlowSpec,
}

impl Default for ProjectileSettings {
    fn default() -> Self {
        Self {
            power: 15.0,
            speed: 20.0,
            size: 0.5,
            duration: 3.0,
            turn_speed: 20.0,
            hit_threshold: 1.5,
            terminal_distance: 5.0,
            burst_spacing: 0.15,
            slow: SlowSpec::new(40.0, 2.0),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AreaSettings {
    pub power: f32,
    pub radius: f32,
    pub duration: f32,
    pub tick_rate: f32,
    /// Time for the radius to grow from `start_radius` to full size.
    pub expand_time: f32,
    pub start_radius: f32,
    /// Distance from the caster along the fire direction where the zone is centred.
    pub spawn_offset: f32,
    pub slow: SlowSpec,
}

impl Default for AreaSettings {
    fn default() -> Self {
        Self {
            power: 5.0,
            radius: 4.0,
            duration: 5.0,
            tick_rate: 1.0,
            expand_time: 0.5,
            start_radius: 0.05,
            spawn_offset: 3.0,
            slow: SlowSpec::new(30.0, 1.5),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BeamSettings {
    pub power: f32,
    pub length: f32,
    pub half_width: f32,
    pub duration: f32,
    pub tick_rate: f32,
    pub ramp_up_speed: f32,
    /// Extra length past a blocking obstacle so the beam visibly touches it.
    pub visual_penetration: f32,
    /// Power lost per hit rank (0 = no falloff).
    pub damage_decay: f32,
    pub slow: SlowSpec,
}

impl Default for BeamSettings {
    fn default() -> Self {
        Self {
            power: 8.0,
            length: 10.0,
            half_width: 0.5,
            duration: 3.5,
            tick_rate: 1.5,
            ramp_up_speed: 0.5,
            visual_penetration: 0.5,
            damage_decay: 0.3,
            slow: SlowSpec::new(10.0, 0.2),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BuffSettings {
    pub power: f32,
    pub duration: f32,
    pub tick_rate: f32,
    pub loot_luck_chance: f32,
}

impl Default for BuffSettings {
    fn default() -> Self {
        Self {
            power: 20.0,
            duration: 10.0,
            tick_rate: 1.0,
            loot_luck_chance: 0.2,
        }
    }
}

/// Level scaling and per-color extension factors.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ProgressionRules {
    pub power_per_level: f32,
    pub red_power_factor: f32,
    pub red_decay_factor: f32,
    pub blue_size_factor: f32,
    pub blue_duration_bonus: f32,
    /// Divisor applied to the tick rate by a green extension (< 1 speeds ticks up).
    pub green_tick_factor: f32,
    pub yellow_luck_bonus: f32,
}

impl Default for ProgressionRules {
    fn default() -> Self {
        Self {
            power_per_level: 0.25,
            red_power_factor: 1.5,
            red_decay_factor: 0.5,
            blue_size_factor: 1.4,
            blue_duration_bonus: 2.0,
            green_tick_factor: 0.7,
            yellow_luck_bonus: 0.2,
        }
    }
}

/// Tuning for non-player combat targets.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TargetRules {
    pub max_health: f32,
    /// Fraction of max health a protected target spawns with.
    pub protected_start_fraction: f32,
    pub slow_decay_per_sec: f32,
    pub freeze_duration: f32,
    pub frozen_damage_multiplier: f32,
    pub respawn_delay: f32,
    /// Quiet time after the last hit before the combat meter reports.
    pub combat_reset_delay: f32,
}

impl Default for TargetRules {
    fn default() -> Self {
        Self {
            max_health: 1000.0,
            protected_start_fraction: 0.2,
            slow_decay_per_sec: 20.0,
            freeze_duration: 3.0,
            frozen_damage_multiplier: 1.5,
            respawn_delay: 2.0,
            combat_reset_delay: 2.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PlayerRules {
    pub max_health: f32,
    pub max_stamina: f32,
    pub stamina_regen: f32,
    pub exhaustion_duration: f32,
    /// Stamina drained per point of raw damage while guarding.
    pub guard_stamina_factor: f32,
    pub exhausted_speed_factor: f32,
}

impl Default for PlayerRules {
    fn default() -> Self {
        Self {
            max_health: 100.0,
            max_stamina: 100.0,
            stamina_regen: 15.0,
            exhaustion_duration: 2.0,
            guard_stamina_factor: 0.5,
            exhausted_speed_factor: 0.5,
        }
    }
}

/// One melee swing profile.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SwingSpec {
    pub duration: f32,
    pub damage: f32,
    pub reach: f32,
}

impl SwingSpec {
    pub const fn new(duration: f32, damage: f32, reach: f32) -> Self {
        Self {
            duration,
            damage,
            reach,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ControllerRules {
    pub heavy_min_charge: f32,
    pub guard_tap_window: f32,
    pub parry_window: f32,
    /// Forced fire if the animation never signals the fire frame.
    pub cast_safety_timeout: f32,
    pub cast_recovery: f32,
    pub counter_damage: f32,
    pub light: SwingSpec,
    pub sweep: SwingSpec,
    pub heavy: SwingSpec,
}

impl Default for ControllerRules {
    fn default() -> Self {
        Self {
            heavy_min_charge: 0.5,
            guard_tap_window: 0.2,
            parry_window: 0.2,
            cast_safety_timeout: 0.4,
            cast_recovery: 0.2,
            counter_damage: 80.0,
            light: SwingSpec::new(0.2, 10.0, 1.5),
            sweep: SwingSpec::new(0.3, 8.0, 2.0),
            heavy: SwingSpec::new(0.4, 25.0, 2.5),
        }
    }
}

/// All balance tables in one value; the default oracle implementation.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BalanceTables {
    pub projectile: ProjectileSettings,
    pub area: AreaSettings,
    pub beam: BeamSettings,
    pub buff: BuffSettings,
    pub progression: ProgressionRules,
    pub target: TargetRules,
    pub player: PlayerRules,
    pub controller: ControllerRules,
}

impl TablesOracle for BalanceTables {
    fn projectile(&self) -> ProjectileSettings {
        self.projectile
    }

    fn area(&self) -> AreaSettings {
        self.area
    }

    fn beam(&self) -> BeamSettings {
        self.beam
    }

    fn buff(&self) -> BuffSettings {
        self.buff
    }

    fn progression(&self) -> ProgressionRules {
        self.progression
    }

    fn target_rules(&self) -> TargetRules {
        self.target
    }

    fn player_rules(&self) -> PlayerRules {
        self.player
    }

    fn controller_rules(&self) -> ControllerRules {
        self.controller
    }
}
