//! Money and lives bookkeeping.

/// Money, lives and the terminal game-over flag.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EconomyState {
    money: u32,
    lives: i32,
    game_over: bool,
}

impl EconomyState {
    pub(crate) const fn new(money: u32, lives: i32) -> Self {
        Self {
            money,
            lives,
            game_over: lives <= 0,
        }
    }

    /// Money available for purchases.
    #[must_use]
    pub const fn money(&self) -> u32 {
        self.money
    }

    /// Lives remaining; may dip below zero on the tick the game ends.
    #[must_use]
    pub const fn lives(&self) -> i32 {
        self.lives
    }

    /// Reports whether the terminal state was reached.
    #[must_use]
    pub const fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub(crate) fn earn(&mut self, amount: u32) {
        self.money = self.money.saturating_add(amount);
    }

    /// Callers check [`EconomyState::can_afford`] first.
    pub(crate) fn spend(&mut self, cost: u32) {
        self.money = self.money.saturating_sub(cost);
    }

    pub(crate) const fn can_afford(&self, cost: u32) -> bool {
        self.money >= cost
    }

    /// Returns `true` when this loss ended the game.
    pub(crate) fn lose_life(&mut self) -> bool {
        self.lives = self.lives.saturating_sub(1);
        if self.lives <= 0 && !self.game_over {
            self.game_over = true;
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spending_follows_affordability() {
        let mut economy = EconomyState::new(40, 10);
        assert!(!economy.can_afford(50));

        economy.earn(20);
        assert!(economy.can_afford(50));
        economy.spend(50);
        assert_eq!(economy.money(), 10);
    }

    #[test]
    fn last_life_triggers_game_over_once() {
        let mut economy = EconomyState::new(0, 2);
        assert!(!economy.lose_life());
        assert!(economy.lose_life());
        assert!(economy.is_game_over());
        assert!(!economy.lose_life());
        assert_eq!(economy.lives(), -1);
    }
}
