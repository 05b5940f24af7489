//! Menu Actions
//!
//! The four player-facing behaviors behind the main menu, as stateless
//! functions over the mutation service: mining, inventory, upgrades, and
//! the shop. Each returns `true` when control goes back to the menu,
//! which in the current game is always.

use crate::core::config::{PacingConfig, UpgradeConfig, EVENT_DEFENCE_DURATION};
use crate::core::rng::GameRng;
use crate::game::service::StateService;
use crate::game::GameError;
use crate::ui::Ui;

// =============================================================================
// DISPATCH
// =============================================================================

/// One parsed top-level menu command.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuCommand {
    /// `1` - run a mining action.
    Mine,
    /// `2` - inventory and selling.
    Inventory,
    /// `3` - upgrades.
    Upgrades,
    /// `4` - the shop.
    Shop,
    /// `5` - save and exit.
    Quit,
    /// Hidden diagnostic: force a specific event.
    Debug,
}

impl MenuCommand {
    /// Parse a trimmed menu input. `None` means invalid input, which the
    /// session re-prompts on.
    pub fn parse(input: &str) -> Option<Self> {
        match input {
            "1" => Some(MenuCommand::Mine),
            "2" => Some(MenuCommand::Inventory),
            "3" => Some(MenuCommand::Upgrades),
            "4" => Some(MenuCommand::Shop),
            "5" => Some(MenuCommand::Quit),
            "debug" => Some(MenuCommand::Debug),
            _ => None,
        }
    }
}

// =============================================================================
// MINING
// =============================================================================

/// One mining run: animation, yield draw, early stop at capacity, then
/// one tick off the event-defence counter.
///
/// A full inventory refuses the run before anything happens (including
/// the defence tick).
pub fn run_mining(
    service: &mut StateService,
    ui: &mut dyn Ui,
    rng: &mut GameRng,
    pacing: &PacingConfig,
) -> Result<bool, GameError> {
    if service.state().inventory_full() {
        ui.clear();
        ui.print_message("Inventory is full");
        ui.pause(pacing.full_inventory_delay);
        return Ok(true);
    }

    let step = service.state().mining_time() / pacing.mining_frames as f64;
    for frame in 1..=pacing.mining_frames {
        ui.clear();
        ui.print_message(&format!("mining{}", ".".repeat(frame as usize)));
        ui.pause(step);
    }

    ui.clear();
    ui.print_message("Done!\n");

    // Yield count from the session pool; each item an independent uniform
    // draw from the session ore pool, truncated at capacity.
    let yield_count = rng.choose(service.state().item_amounts()).copied().unwrap_or(1);
    for _ in 0..yield_count {
        let item = match rng.choose(service.state().ore_pool()).copied() {
            Some(item) => item,
            None => break,
        };
        if service.add_item_to_inventory(item)? {
            ui.print_message(&format!("{} - ${}", item.name, item.price));
        } else {
            break;
        }
    }

    ui.wait_for_acknowledgement("\nPress enter to continue...")?;
    service.reduce_event_defence()?;
    Ok(true)
}

// =============================================================================
// INVENTORY
// =============================================================================

/// Inventory screen: sell everything or go back.
pub fn run_inventory(
    service: &mut StateService,
    ui: &mut dyn Ui,
    pacing: &PacingConfig,
) -> Result<bool, GameError> {
    loop {
        let total = service.state().inventory_value();
        ui.clear();
        ui.print_inventory(service.state().inventory(), total);

        match ui.read_choice("choice: ")?.as_str() {
            "1" => {
                service.add_money(total)?;
                service.clear_inventory()?;
                ui.clear();
                ui.print_message(&format!("Sold all items for ${total}!"));
                ui.pause(pacing.message_delay);
                return Ok(true);
            }
            "2" => return Ok(true),
            _ => {
                ui.clear();
                ui.print_message("Invalid choice!");
                ui.pause(pacing.invalid_choice_delay);
            }
        }
    }
}

// =============================================================================
// UPGRADES
// =============================================================================

/// Speed upgrade cost for the current mining time, charged in whole
/// dollars: max(min_cost, base - mining_time * factor).
pub fn speed_upgrade_cost(upgrades: &UpgradeConfig, mining_time: f64) -> i64 {
    (upgrades.speed_cost_base - mining_time * upgrades.speed_cost_factor)
        .max(upgrades.speed_min_cost)
        .round() as i64
}

/// Capacity upgrade cost for the current capacity.
pub fn capacity_upgrade_cost(upgrades: &UpgradeConfig, capacity: usize) -> i64 {
    capacity as i64 * upgrades.capacity_cost_multiplier
}

/// Upgrades screen: buy speed or capacity until the player exits.
pub fn run_upgrades(
    service: &mut StateService,
    ui: &mut dyn Ui,
    upgrades: &UpgradeConfig,
    pacing: &PacingConfig,
) -> Result<bool, GameError> {
    loop {
        let speed_cost = speed_upgrade_cost(upgrades, service.state().mining_time());
        let capacity_cost = capacity_upgrade_cost(upgrades, service.state().item_capacity());

        ui.clear();
        ui.print_upgrades(service.state().money(), speed_cost, capacity_cost);

        match ui.read_choice("choice: ")?.as_str() {
            "1" => {
                buy_speed_upgrade(service, ui, upgrades, pacing)?;
                service.save_state()?;
            }
            "2" => {
                buy_capacity_upgrade(service, ui, upgrades, pacing)?;
                service.save_state()?;
            }
            "3" => {
                service.save_state()?;
                return Ok(true);
            }
            _ => {
                ui.clear();
                ui.print_message("Invalid choice!");
                ui.pause(pacing.invalid_choice_delay);
            }
        }
    }
}

fn buy_speed_upgrade(
    service: &mut StateService,
    ui: &mut dyn Ui,
    upgrades: &UpgradeConfig,
    pacing: &PacingConfig,
) -> Result<bool, GameError> {
    let mining_time = service.state().mining_time();
    let cost = speed_upgrade_cost(upgrades, mining_time);

    if service.state().money() < cost {
        ui.clear();
        ui.print_message("Not enough money!");
        ui.pause(pacing.message_delay);
        return Ok(false);
    }

    service.deduct_money(cost)?;
    // The reduction scales with the pre-upgrade mining time.
    service.increase_mining_speed(upgrades.speed_decrease_rate * mining_time)?;

    ui.clear();
    ui.print_message("Mining speed has been increased!");
    ui.pause(pacing.message_delay);
    Ok(true)
}

fn buy_capacity_upgrade(
    service: &mut StateService,
    ui: &mut dyn Ui,
    upgrades: &UpgradeConfig,
    pacing: &PacingConfig,
) -> Result<bool, GameError> {
    let cost = capacity_upgrade_cost(upgrades, service.state().item_capacity());

    if service.state().money() < cost {
        ui.clear();
        ui.print_message("Not enough money!");
        ui.pause(pacing.message_delay);
        return Ok(false);
    }

    service.deduct_money(cost)?;
    service.increase_item_capacity(1)?;

    ui.clear();
    ui.print_message(&format!(
        "Item capacity has been increased! Current capacity: {}",
        service.state().item_capacity()
    ));
    ui.pause(pacing.message_delay);
    Ok(true)
}

// =============================================================================
// SHOP
// =============================================================================

/// What a purchased deal does.
#[derive(Clone, Copy, Debug)]
pub enum DealEffect {
    /// Suppress event rolls for the next `minings` mining runs.
    EventDefence {
        /// Covered mining runs.
        minings: u32,
    },
}

/// One purchasable shop deal.
#[derive(Clone, Copy, Debug)]
pub struct Deal {
    /// Shopkeeper's name for the deal.
    pub name: &'static str,
    /// Price in dollars.
    pub cost: i64,
    /// Sales pitch.
    pub description: &'static str,
    /// What buying it does.
    pub effect: DealEffect,
}

/// Current deal catalog, keyed by menu position starting at "1".
pub const DEALS: [Deal; 1] = [Deal {
    name: "God bless.",
    cost: 100,
    description: "Defend yourself from all events for 10 minings",
    effect: DealEffect::EventDefence { minings: EVENT_DEFENCE_DURATION },
}];

const SHOP_GREETINGS: [&str; 4] = [
    "... Who is there? Oh, it's you! Welcome to my shop!",
    "Looking for something special, stranger?",
    "Find the best deals here!",
    "Your adventure starts with the right gear!",
];

/// Shop screen: browse and buy deals, or leave (which saves).
pub fn run_shop(
    service: &mut StateService,
    ui: &mut dyn Ui,
    rng: &mut GameRng,
    pacing: &PacingConfig,
) -> Result<bool, GameError> {
    loop {
        ui.clear();
        let greeting = rng.choose(&SHOP_GREETINGS).copied().unwrap_or(SHOP_GREETINGS[0]);
        ui.slow_reveal(&format!("{greeting}\n"), pacing.reveal_char_delay);
        ui.print_message("[1] Look at deals");
        ui.print_message("[2] Leave shop");

        match ui.read_choice("choice: ")?.as_str() {
            "1" => {
                ui.clear();
                for (idx, deal) in DEALS.iter().enumerate() {
                    ui.print_message(&format!(
                        "[{}] {}: {} (Cost: ${})",
                        idx + 1,
                        deal.name,
                        deal.description,
                        deal.cost
                    ));
                }

                let pick = ui.read_choice(
                    "That's a good deal! I'll take it.\n\
                     Choose a deal number or press enter to go back: ",
                )?;
                match deal_by_key(&pick) {
                    Some(deal) => {
                        buy_deal(deal, service, ui, pacing)?;
                        ui.pause(pacing.message_delay);
                    }
                    None => {
                        ui.clear();
                        ui.print_message("Returning to shop menu...");
                        ui.pause(pacing.message_delay);
                    }
                }
            }
            "2" => {
                service.save_state()?;
                return Ok(true);
            }
            _ => {
                ui.clear();
                ui.print_message("Invalid choice!");
                ui.pause(pacing.invalid_choice_delay);
            }
        }
    }
}

fn deal_by_key(key: &str) -> Option<&'static Deal> {
    let idx: usize = key.parse().ok()?;
    idx.checked_sub(1).and_then(|i| DEALS.get(i))
}

fn buy_deal(
    deal: &Deal,
    service: &mut StateService,
    ui: &mut dyn Ui,
    pacing: &PacingConfig,
) -> Result<bool, GameError> {
    if service.state().money() < deal.cost {
        ui.clear();
        ui.print_message("Not enough money!");
        ui.pause(pacing.message_delay);
        return Ok(false);
    }

    service.deduct_money(deal.cost)?;
    match deal.effect {
        DealEffect::EventDefence { minings } => {
            service.add_event_defence(minings)?;
            ui.clear();
            ui.print_message(&format!(
                "You are now protected from all events for the next {minings} minings!"
            ));
        }
    }
    Ok(true)
}

// =============================================================================
// TESTS
// =============================================================================
