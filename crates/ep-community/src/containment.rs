//! Containment policy toggles and the escalation ladder used to compare them.

use std::fmt;

/// Policy flags in force in a community.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ContainmentMeasures {
    /// Transmission probability scaled by the mask factor.
    pub mask_mandate:   bool,
    /// Remote-capable workers and all students stay home.
    pub work_from_home: bool,
    /// Hardware stores closed; grocery stores stay open.
    pub shops_closed:   bool,
    /// Only critical-infrastructure workers go to work; no travel, no school,
    /// no hardware-store runs.
    pub lockdown:       bool,
}

impl ContainmentMeasures {
    pub const NONE: ContainmentMeasures = ContainmentMeasures {
        mask_mandate:   false,
        work_from_home: false,
        shops_closed:   false,
        lockdown:       false,
    };

    /// `true` if any measure is active.
    pub fn any(&self) -> bool {
        self.mask_mandate || self.work_from_home || self.shops_closed || self.lockdown
    }
}

/// Five escalating policy stages; each adds one measure to the previous.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ContainmentStage {
    #[default]
    None,
    MaskMandate,
    WorkFromHome,
    ShopClosure,
    Lockdown,
}

impl ContainmentStage {
    pub const ALL: [ContainmentStage; 5] = [
        ContainmentStage::None,
        ContainmentStage::MaskMandate,
        ContainmentStage::WorkFromHome,
        ContainmentStage::ShopClosure,
        ContainmentStage::Lockdown,
    ];

    /// Next stage of the ladder; `Lockdown` wraps to `None`.
    pub fn next(self) -> ContainmentStage {
        Self::ALL[(self as usize + 1) % Self::ALL.len()]
    }

    /// Stage used by the `run`-th experiment of a comparison.
    pub fn for_run(run: usize) -> ContainmentStage {
        Self::ALL[run % Self::ALL.len()]
    }

    /// Cumulative measures in force at this stage.
    pub fn measures(self) -> ContainmentMeasures {
        let level = self as u8;
        ContainmentMeasures {
            mask_mandate:   level >= ContainmentStage::MaskMandate as u8,
            work_from_home: level >= ContainmentStage::WorkFromHome as u8,
            shops_closed:   level >= ContainmentStage::ShopClosure as u8,
            lockdown:       level >= ContainmentStage::Lockdown as u8,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ContainmentStage::None         => "none",
            ContainmentStage::MaskMandate  => "mask_mandate",
            ContainmentStage::WorkFromHome => "work_from_home",
            ContainmentStage::ShopClosure  => "shop_closure",
            ContainmentStage::Lockdown     => "lockdown",
        }
    }
}

impl fmt::Display for ContainmentStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
