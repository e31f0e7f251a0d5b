//! Editable buy/sell trigger thresholds. Each numeric field is shown through
//! a slider and a number input that must stay numerically equal; both are
//! views onto one canonical value, so there is no mutual-listener update
//! cycle to break. The edit buffer is local until a save round trip succeeds.

use crate::wire::{BuyTriggersWire, SellTriggersWire, TriggerConfigWire};

// Defaults applied per field when the server config omits one.
pub const DEFAULT_BUY_RSI_BELOW: f64 = 30.0;
pub const DEFAULT_BUY_DIP_PERCENT: f64 = 5.0;
pub const DEFAULT_BUY_VOLUME_SPIKE: f64 = 1.5;
pub const DEFAULT_SELL_RSI_ABOVE: f64 = 70.0;
pub const DEFAULT_SELL_RISE_PERCENT: f64 = 10.0;
pub const DEFAULT_SELL_STOP_LOSS: f64 = 5.0;
pub const DEFAULT_SELL_TAKE_PROFIT: f64 = 15.0;

/// Which paired control wrote a value. Purely informational: both controls
/// mirror the same canonical value either way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Slider,
    Input,
}

/// One canonical value with two presentation views. Writing either view
/// overwrites the canonical value; reading either returns it unchanged.
#[derive(Debug, Clone, Copy)]
pub struct BoundPair {
    value: f64,
}

impl BoundPair {
    pub fn new(value: f64) -> Self {
        Self { value }
    }

    pub fn write(&mut self, _control: Control, value: f64) {
        self.value = value;
    }

    pub fn slider(&self) -> f64 {
        self.value
    }

    pub fn input(&self) -> f64 {
        self.value
    }

    pub fn value(&self) -> f64 {
        self.value
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerField {
    BuyRsiBelow,
    BuyDipPercent,
    BuyVolumeSpike,
    SellRsiAbove,
    SellRisePercent,
    SellStopLoss,
    SellTakeProfit,
}

pub const ALL_FIELDS: &[TriggerField] = &[
    TriggerField::BuyRsiBelow,
    TriggerField::BuyDipPercent,
    TriggerField::BuyVolumeSpike,
    TriggerField::SellRsiAbove,
    TriggerField::SellRisePercent,
    TriggerField::SellStopLoss,
    TriggerField::SellTakeProfit,
];

#[derive(Debug, Clone)]
pub struct TriggerEditor {
    pub buy_rsi_below: BoundPair,
    pub buy_dip_percent: BoundPair,
    pub buy_volume_spike: BoundPair,
    pub buy_require_all: bool,
    pub buy_enabled: bool,

    pub sell_rsi_above: BoundPair,
    pub sell_rise_percent: BoundPair,
    pub sell_stop_loss: BoundPair,
    pub sell_take_profit: BoundPair,
    pub sell_enabled: bool,

    /// Server copy as of the last successful save/load; distinct from the
    /// edit buffer above until a round trip completes.
    confirmed: Option<TriggerConfigWire>,
}

impl Default for TriggerEditor {
    fn default() -> Self {
        Self {
            buy_rsi_below: BoundPair::new(DEFAULT_BUY_RSI_BELOW),
            buy_dip_percent: BoundPair::new(DEFAULT_BUY_DIP_PERCENT),
            buy_volume_spike: BoundPair::new(DEFAULT_BUY_VOLUME_SPIKE),
            buy_require_all: true,
            buy_enabled: true,
            sell_rsi_above: BoundPair::new(DEFAULT_SELL_RSI_ABOVE),
            sell_rise_percent: BoundPair::new(DEFAULT_SELL_RISE_PERCENT),
            sell_stop_loss: BoundPair::new(DEFAULT_SELL_STOP_LOSS),
            sell_take_profit: BoundPair::new(DEFAULT_SELL_TAKE_PROFIT),
            sell_enabled: true,
            confirmed: None,
        }
    }
}

impl TriggerEditor {
    pub fn new() -> Self {
        Self::default()
    }

    fn pair_mut(&mut self, field: TriggerField) -> &mut BoundPair {
        match field {
            TriggerField::BuyRsiBelow => &mut self.buy_rsi_below,
            TriggerField::BuyDipPercent => &mut self.buy_dip_percent,
            TriggerField::BuyVolumeSpike => &mut self.buy_volume_spike,
            TriggerField::SellRsiAbove => &mut self.sell_rsi_above,
            TriggerField::SellRisePercent => &mut self.sell_rise_percent,
            TriggerField::SellStopLoss => &mut self.sell_stop_loss,
            TriggerField::SellTakeProfit => &mut self.sell_take_profit,
        }
    }

    pub fn pair(&self, field: TriggerField) -> &BoundPair {
        match field {
            TriggerField::BuyRsiBelow => &self.buy_rsi_below,
            TriggerField::BuyDipPercent => &self.buy_dip_percent,
            TriggerField::BuyVolumeSpike => &self.buy_volume_spike,
            TriggerField::SellRsiAbove => &self.sell_rsi_above,
            TriggerField::SellRisePercent => &self.sell_rise_percent,
            TriggerField::SellStopLoss => &self.sell_stop_loss,
            TriggerField::SellTakeProfit => &self.sell_take_profit,
        }
    }

    pub fn set(&mut self, field: TriggerField, control: Control, value: f64) {
        self.pair_mut(field).write(control, value);
    }

    /// Populates every pair from a server config, substituting the documented
    /// default for each absent field independently.
    pub fn load(&mut self, wire: &TriggerConfigWire) {
        let b = &wire.buy;
        self.buy_rsi_below = BoundPair::new(b.rsi_below.unwrap_or(DEFAULT_BUY_RSI_BELOW));
        self.buy_dip_percent = BoundPair::new(b.dip_percent.unwrap_or(DEFAULT_BUY_DIP_PERCENT));
        self.buy_volume_spike = BoundPair::new(b.volume_spike.unwrap_or(DEFAULT_BUY_VOLUME_SPIKE));
        self.buy_require_all = b.require_all.unwrap_or(true);
        self.buy_enabled = b.enabled.unwrap_or(true);

        let s = &wire.sell;
        self.sell_rsi_above = BoundPair::new(s.rsi_above.unwrap_or(DEFAULT_SELL_RSI_ABOVE));
        self.sell_rise_percent = BoundPair::new(s.rise_percent.unwrap_or(DEFAULT_SELL_RISE_PERCENT));
        self.sell_stop_loss = BoundPair::new(s.stop_loss.unwrap_or(DEFAULT_SELL_STOP_LOSS));
        self.sell_take_profit = BoundPair::new(s.take_profit.unwrap_or(DEFAULT_SELL_TAKE_PROFIT));
        self.sell_enabled = s.enabled.unwrap_or(true);

        self.confirmed = Some(self.to_wire());
    }

    /// Serializes the whole edit buffer for submission. Submission is always
    /// wholesale, never a partial patch.
    pub fn to_wire(&self) -> TriggerConfigWire {
        TriggerConfigWire {
            buy: BuyTriggersWire {
                rsi_below: Some(self.buy_rsi_below.value()),
                dip_percent: Some(self.buy_dip_percent.value()),
                volume_spike: Some(self.buy_volume_spike.value()),
                require_all: Some(self.buy_require_all),
                enabled: Some(self.buy_enabled),
            },
            sell: SellTriggersWire {
                rsi_above: Some(self.sell_rsi_above.value()),
                rise_percent: Some(self.sell_rise_percent.value()),
                stop_loss: Some(self.sell_stop_loss.value()),
                take_profit: Some(self.sell_take_profit.value()),
                enabled: Some(self.sell_enabled),
            },
        }
    }

    /// Called only after the save round trip reports success. A failed save
    /// keeps both the edit buffer (for retry) and the old confirmed copy.
    pub fn mark_saved(&mut self) {
        self.confirmed = Some(self.to_wire());
    }

    pub fn confirmed(&self) -> Option<&TriggerConfigWire> {
        self.confirmed.as_ref()
    }
}
