use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShopItem {
    Water,
    Nutrients,
    Energy,
}

impl ShopItem {
    pub const ALL: [ShopItem; 3] = [ShopItem::Water, ShopItem::Nutrients, ShopItem::Energy];

    pub fn cost(self) -> u32 {
        match self {
            ShopItem::Water => 10,
            ShopItem::Nutrients => 15,
            ShopItem::Energy => 20,
        }
    }

    /// Amount restored to the matching resource, before clamping.
    pub fn restores(self) -> f64 {
        match self {
            ShopItem::Water | ShopItem::Nutrients => 20.0,
            ShopItem::Energy => 30.0,
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown shop item '{0}'")]
pub struct UnknownShopItem(pub String);

impl FromStr for ShopItem {
    type Err = UnknownShopItem;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "water" => Ok(ShopItem::Water),
            "nutrients" => Ok(ShopItem::Nutrients),
            "energy" => Ok(ShopItem::Energy),
            _ => Err(UnknownShopItem(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_prices_and_amounts() {
        for item in ShopItem::ALL {
            assert!(item.restores() >= item.cost() as f64, "{item:?}");
        }
        assert_eq!(ShopItem::Energy.cost(), 20);
        assert_eq!(ShopItem::Energy.restores(), 30.0);
    }

    #[test]
    fn parses_item_names() {
        for item in ShopItem::ALL {
            let name = serde_json::to_value(item).unwrap();
            let parsed: ShopItem = name.as_str().unwrap().parse().unwrap();
            assert_eq!(parsed, item);
        }
        assert_eq!(" Nutrients ".parse::<ShopItem>().unwrap(), ShopItem::Nutrients);
        let err = "oxygen".parse::<ShopItem>().unwrap_err();
        assert_eq!(err.to_string(), "unknown shop item 'oxygen'");
    }
}
