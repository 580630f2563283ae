//! Falling items: carrots, cabbages and bones.

use crate::vector::Vector2I;

/// Width of the weighted category roll (0..ROLL_RANGE).
pub const ROLL_RANGE: u32 = 100;

/// Item categories. Carrot and cabbage are beneficial, bone is harmful.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemKind {
    /// Beneficial-High.
    Carrot,
    /// Beneficial-Low.
    Cabbage,
    /// Harmful.
    Bone,
}

impl ItemKind {
    pub const ALL: [Self; 3] = [Self::Carrot, Self::Cabbage, Self::Bone];

    /// Map a roll in 0..100 to a category: 0..=39 carrot, 40..=64 cabbage, 65..=99 bone.
    pub fn from_roll(roll: u32) -> Self {
        match roll % ROLL_RANGE {
            0..=39 => Self::Carrot,
            40..=64 => Self::Cabbage,
            _ => Self::Bone,
        }
    }

    pub fn is_harmful(&self) -> bool {
        matches!(self, Self::Bone)
    }

    /// Ticks between row advances. Bones fall twice as fast.
    pub fn fall_reset(&self) -> u32 {
        if self.is_harmful() { 1 } else { 2 }
    }

    /// Score for catching this item; 0 for harmful items.
    pub fn points(&self, difficulty: u32) -> u32 {
        match self {
            Self::Carrot => 20 * difficulty,
            Self::Cabbage => 10 * difficulty,
            Self::Bone => 0,
        }
    }

    /// Colour index into theme.item_color().
    pub fn color_index(&self) -> u8 {
        match self {
            Self::Carrot => 0,
            Self::Cabbage => 1,
            Self::Bone => 2,
        }
    }

    pub fn glyph(&self) -> &'static str {
        match self {
            Self::Carrot => "V",
            Self::Cabbage => "o",
            Self::Bone => "x",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Carrot => "Carrot",
            Self::Cabbage => "Cabbage",
            Self::Bone => "Bone",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FallingItem {
    pub position: Vector2I,
    pub kind: ItemKind,
    /// Ticks left until the next row advance. 0 advances on the next tick.
    pub fall_timer: u32,
}

impl FallingItem {
    pub fn new(position: Vector2I, kind: ItemKind) -> Self {
        Self {
            position,
            kind,
            fall_timer: 0,
        }
    }

    /// Count down the fall timer; drop one row and reset it when it runs out.
    /// Returns true if the item moved.
    pub fn fall(&mut self) -> bool {
        self.fall_timer = self.fall_timer.saturating_sub(1);
        if self.fall_timer == 0 {
            self.position.y += 1;
            self.fall_timer = self.kind.fall_reset();
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roll_partition() {
        assert_eq!(ItemKind::from_roll(0), ItemKind::Carrot);
        assert_eq!(ItemKind::from_roll(39), ItemKind::Carrot);
        assert_eq!(ItemKind::from_roll(40), ItemKind::Cabbage);
        assert_eq!(ItemKind::from_roll(50), ItemKind::Cabbage);
        assert_eq!(ItemKind::from_roll(64), ItemKind::Cabbage);
        assert_eq!(ItemKind::from_roll(65), ItemKind::Bone);
        assert_eq!(ItemKind::from_roll(99), ItemKind::Bone);
    }

    #[test]
    fn test_roll_weights() {
        let mut counts = [0u32; 3];
        for roll in 0..ROLL_RANGE {
            counts[ItemKind::from_roll(roll).color_index() as usize] += 1;
        }
        assert_eq!(counts, [40, 25, 35]);
    }

    #[test]
    fn test_points_scale_with_difficulty() {
        assert_eq!(ItemKind::Carrot.points(1), 20);
        assert_eq!(ItemKind::Carrot.points(3), 60);
        assert_eq!(ItemKind::Cabbage.points(2), 20);
        assert_eq!(ItemKind::Bone.points(3), 0);
    }

    #[test]
    fn test_fresh_item_falls_on_first_tick() {
        let mut item = FallingItem::new(Vector2I::new(5, 0), ItemKind::Carrot);
        assert!(item.fall());
        assert_eq!(item.position.y, 1);
    }

    #[test]
    fn test_bones_fall_twice_as_fast() {
        let mut carrot = FallingItem::new(Vector2I::new(0, 0), ItemKind::Carrot);
        let mut bone = FallingItem::new(Vector2I::new(1, 0), ItemKind::Bone);
        for _ in 0..9 {
            carrot.fall();
            bone.fall();
        }
        assert_eq!(carrot.position.y, 5);
        assert_eq!(bone.position.y, 9);
    }
}
