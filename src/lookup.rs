//! 名称启发式查表模块 - NPC 识别与飞船名解析
//!
//! 全部为只读静态数据，启动时构建一次，解析过程中不做任何分配之外的状态修改。

use regex::Regex;
use std::sync::LazyLock;

/// NPC 名称特征子串（大小写不敏感匹配）
pub const NPC_NAME_MARKERS: &[&str] = &[
    "NPC_",
    "PU_",
    "Kopion",
    "Pirate",
    "Criminal",
    "Guard",
    "Security",
    "UEE_",
    "Vanduul",
    "XenoThreat",
    "Nine_Tails",
    "ninetails",
    "jpt_",
    "crim_",
    "hostage",
    "civilian",
    "pilot_",
    "_AI_",
    "outlaw",
    "bounty_",
    "mission_",
    "merc_",
    "Turret",
];

/// 飞船型号子串 → 友好名称（顺序即优先级，首个命中生效）
pub const SHIP_NAME_TABLE: &[(&str, &str)] = &[
    ("Gladius", "Gladius"),
    ("Arrow", "Arrow"),
    ("Hornet", "Hornet"),
    ("Sabre", "Sabre"),
    ("Vanguard", "Vanguard"),
    ("Eclipse", "Eclipse"),
    ("Retaliator", "Retaliator"),
    ("Hammerhead", "Hammerhead"),
    ("Carrack", "Carrack"),
    ("Cutlass", "Cutlass"),
    ("Freelancer", "Freelancer"),
    ("Caterpillar", "Caterpillar"),
    ("Herald", "Herald"),
    ("Buccaneer", "Buccaneer"),
    ("Constellation", "Constellation"),
    ("Valkyrie", "Valkyrie"),
    ("Reclaimer", "Reclaimer"),
    ("Starfarer", "Starfarer"),
    ("890", "890 Jump"),
    ("Avenger", "Avenger"),
    ("Titan", "Titan"),
    ("Stalker", "Stalker"),
    ("Warlock", "Warlock"),
    ("Mustang", "Mustang"),
    ("Aurora", "Aurora"),
    ("Pisces", "Pisces"),
    ("Mercury", "Mercury Star Runner"),
    ("Terrapin", "Terrapin"),
    ("Prospector", "Prospector"),
    ("Mole", "MOLE"),
    ("Vulture", "Vulture"),
    ("Spirit", "Spirit"),
    ("Scorpius", "Scorpius"),
    ("Redeemer", "Redeemer"),
    ("Paladin", "Paladin"),
    ("Zeus", "Zeus"),
];

/// 制造商前缀 → 厂商名，用于 `PREFIX_Remainder` 形态的载具 ID 兜底
pub const MANUFACTURER_PREFIXES: &[(&str, &str)] = &[
    ("ORIG", "Origin"),
    ("ANVL", "Anvil"),
    ("AEGS", "Aegis"),
    ("DRAK", "Drake"),
    ("MISC", "MISC"),
    ("RSI", "RSI"),
    ("CNOU", "C.O."),
    ("ARGO", "Argo"),
    ("BANU", "Banu"),
    ("XIAN", "Xi'an"),
    ("GAMA", "Gatac"),
    ("KRIG", "Kruger"),
    ("TMBL", "Tumbril"),
    ("VNCL", "Vanduul"),
    ("CRUS", "Crusader"),
];

/// `Word_Word_数字` 形态的名字大多是 NPC
static NPC_SHAPE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z]+_[A-Za-z]+_\d+").expect("invalid NPC shape pattern"));

/// 判断名字是否像 NPC
pub fn is_npc(name: &str) -> bool {
    if name.is_empty() {
        return false;
    }
    let lower = name.to_lowercase();
    if NPC_NAME_MARKERS
        .iter()
        .any(|marker| lower.contains(&marker.to_lowercase()))
    {
        return true;
    }
    NPC_SHAPE_RE.is_match(name)
}

/// 从 zone 字符串或载具 ID 解析友好飞船名
///
/// 先查型号子串表（表序优先），再尝试制造商前缀兜底，
/// 合成 `"<厂商> <余部>"`。都不命中返回 None。
pub fn resolve_ship_name(zone_or_id: &str) -> Option<String> {
    if zone_or_id.is_empty() {
        return None;
    }

    let lower = zone_or_id.to_lowercase();
    for (key, name) in SHIP_NAME_TABLE {
        if lower.contains(&key.to_lowercase()) {
            return Some((*name).to_string());
        }
    }

    for (prefix, manufacturer) in MANUFACTURER_PREFIXES {
        if zone_or_id.starts_with(&format!("{}_", prefix)) {
            let remainder = zone_or_id.split('_').nth(1).unwrap_or("");
            return Some(format!("{} {}", manufacturer, remainder).trim().to_string());
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_npc_by_marker() {
        assert!(is_npc("NPC_Guard_01"));
        assert!(is_npc("PU_Pilots_Human_Criminal"));
        assert!(is_npc("Kopion_Alpha"));
        // 大小写不敏感
        assert!(is_npc("vanduul_warrior"));
    }

    #[test]
    fn test_is_npc_by_shape() {
        // 不含任何特征子串，但符合 Word_Word_数字 形态
        assert!(is_npc("Shipjacker_Grunt_06"));
    }

    #[test]
    fn test_is_npc_player_handles() {
        assert!(!is_npc("Hero123"));
        assert!(!is_npc("Dark_Wanderer"));
        assert!(!is_npc(""));
    }

    #[test]
    fn test_resolve_ship_name_table_hit() {
        assert_eq!(
            resolve_ship_name("AEGS_Gladius_2233"),
            Some("Gladius".to_string())
        );
        // 表序优先："890" 命中在前缀兜底之前
        assert_eq!(
            resolve_ship_name("ORIG_890J_01"),
            Some("890 Jump".to_string())
        );
    }

    #[test]
    fn test_resolve_ship_name_prefix_fallback() {
        assert_eq!(
            resolve_ship_name("ORIG_100i_55"),
            Some("Origin 100i".to_string())
        );
        assert_eq!(
            resolve_ship_name("DRAK_Corsair_12"),
            Some("Drake Corsair".to_string())
        );
    }

    #[test]
    fn test_resolve_ship_name_miss() {
        assert_eq!(resolve_ship_name("OOC_Station_Hangar"), None);
        assert_eq!(resolve_ship_name(""), None);
    }
}
