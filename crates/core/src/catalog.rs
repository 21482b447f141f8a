#![forbid(unsafe_code)]

//! Static category/subcategory reference tables and the join that turns
//! them into the browse tree. Counts are deterministic placeholders derived
//! from the codes, not live stock figures.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Group {
    pub code: i64,
    pub name: &'static str,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Subgroup {
    pub group_code: i64,
    pub code: i64,
    pub name: &'static str,
}

pub const GROUPS: &[Group] = &[
    Group { code: 1, name: "MOTOR" },
    Group { code: 2, name: "ALIMENTACAO" },
    Group { code: 3, name: "REFRIGERACAO" },
    Group { code: 4, name: "EMBREAGEM" },
    Group { code: 5, name: "FREIOS" },
    Group { code: 6, name: "SUSPENSAO" },
    Group { code: 7, name: "JUNTAS" },
    Group { code: 8, name: "INATIVO" },
    Group { code: 9, name: "DIVERSOS" },
    Group { code: 10, name: "ELETRICA" },
    Group { code: 11, name: "CAMBIO" },
    Group { code: 12, name: "DIFERENCIAL" },
    Group { code: 13, name: "ACESSORIOS" },
];

pub const SUBGROUPS: &[Subgroup] = &[
    Subgroup { group_code: 1, code: 1, name: "AJUSTAR SUBGRUPO" },
    Subgroup { group_code: 2, code: 1, name: "CADASTRAR SUBGRUPO" },
    Subgroup { group_code: 3, code: 1, name: "CADASTRAR SUBGRUPO" },
    Subgroup { group_code: 4, code: 1, name: "CADASTRAR SUBGRUPO" },
    Subgroup { group_code: 5, code: 1, name: "CADASTRAR SUBGRUPO" },
    Subgroup { group_code: 6, code: 1, name: "CADASTRAR SUBGRUPO" },
    Subgroup { group_code: 7, code: 1, name: "CADASTRAR SUBGRUPO" },
    Subgroup { group_code: 8, code: 1, name: "INATIVO" },
    Subgroup { group_code: 9, code: 1, name: "CADASTRAR SUBGRUPO" },
    Subgroup { group_code: 10, code: 1, name: "CADASTRAR SUBGRUPO" },
    Subgroup { group_code: 11, code: 1, name: "CADASTRAR SUBGRUPO" },
    Subgroup { group_code: 12, code: 1, name: "CADASTRAR SUBGRUPO" },
    Subgroup { group_code: 13, code: 1, name: "CADASTRAR SUBGRUPO" },
    Subgroup { group_code: 1, code: 3, name: "JUNTAS DO MOTOR" },
    Subgroup { group_code: 1, code: 2, name: "ANEIS" },
    Subgroup { group_code: 1, code: 8, name: "PISTOES" },
    Subgroup { group_code: 1, code: 4, name: "JUNTA SUPERIOR" },
    Subgroup { group_code: 1, code: 5, name: "PARAFUSO DO CABECOTE" },
    Subgroup { group_code: 1, code: 6, name: "VALVULAS DO CABECOTE" },
    Subgroup { group_code: 1, code: 9, name: "BOMBA DE OLEO" },
    Subgroup { group_code: 3, code: 2, name: "BOMBA AGUA" },
    Subgroup { group_code: 3, code: 4, name: "RADIADOR" },
    Subgroup { group_code: 5, code: 2, name: "CILINDRO MESTRE" },
    Subgroup { group_code: 5, code: 3, name: "CILINDRO DE RODA" },
    Subgroup { group_code: 5, code: 4, name: "PASTILHA DE FREIO" },
    Subgroup { group_code: 5, code: 5, name: "SAPATA DE FREIO" },
    Subgroup { group_code: 10, code: 2, name: "CABO DE VELAS" },
    Subgroup { group_code: 10, code: 3, name: "VELAS" },
    Subgroup { group_code: 10, code: 4, name: "TAMPA/ROTOR/COND/PLATINADO" },
    Subgroup { group_code: 1, code: 10, name: "CARTER/PROTETOR" },
    Subgroup { group_code: 6, code: 2, name: "PIVOS/TERMINAIS" },
    Subgroup { group_code: 6, code: 3, name: "BARRAS DE DIRECAO" },
    Subgroup { group_code: 6, code: 4, name: "BARRAS AXIAIS" },
    Subgroup { group_code: 3, code: 3, name: "RESERVATORIO" },
    Subgroup { group_code: 1, code: 7, name: "BRONZINAS" },
    Subgroup { group_code: 6, code: 5, name: "AMORTECEDOR" },
    Subgroup { group_code: 6, code: 6, name: "MOLAS" },
    Subgroup { group_code: 6, code: 7, name: "CAIXA DE DIRECAO" },
    Subgroup { group_code: 5, code: 6, name: "DISCO" },
    Subgroup { group_code: 6, code: 8, name: "HOMOCINETICAS" },
    Subgroup { group_code: 1, code: 11, name: "FILTRO DE OLEO" },
    Subgroup { group_code: 2, code: 2, name: "FILTRO DE COMBUSTIVEL" },
    Subgroup { group_code: 2, code: 3, name: "FILTRO DE AR" },
    Subgroup { group_code: 3, code: 5, name: "VALVULA TERMOSTATICA" },
    Subgroup { group_code: 1, code: 12, name: "JUNTA DO CABECOTE" },
    Subgroup { group_code: 1, code: 13, name: "POLIAS E TENSORES" },
    Subgroup { group_code: 2, code: 4, name: "CABO DE ACELERADOR" },
    Subgroup { group_code: 2, code: 5, name: "CABO DE AFOGADOR" },
    Subgroup { group_code: 10, code: 5, name: "BOBINAS" },
    Subgroup { group_code: 6, code: 9, name: "BANDEJAS/BRACOS" },
    Subgroup { group_code: 5, code: 7, name: "INATIVO" },
    Subgroup { group_code: 1, code: 14, name: "CAMISAS" },
    Subgroup { group_code: 1, code: 15, name: "CAPAS" },
    Subgroup { group_code: 1, code: 16, name: "ENGRENAGEM" },
    Subgroup { group_code: 1, code: 17, name: "TUCHO" },
    Subgroup { group_code: 1, code: 18, name: "CORREIA DENTADA" },
    Subgroup { group_code: 2, code: 6, name: "CARBURADOR" },
    Subgroup { group_code: 2, code: 7, name: "MANGUEIRAS DO FILTRO DE AR" },
    Subgroup { group_code: 2, code: 8, name: "BOMBA DE COMBUSTIVEL" },
    Subgroup { group_code: 2, code: 9, name: "KIT DE CAR./BOIA/AGULHA" },
    Subgroup { group_code: 3, code: 6, name: "CANOTE" },
    Subgroup { group_code: 3, code: 7, name: "MANGUEIRAS" },
    Subgroup { group_code: 3, code: 8, name: "CARACA DE VALVULA" },
    Subgroup { group_code: 3, code: 9, name: "CARCACA DE BOMBA DAGUA" },
    Subgroup { group_code: 5, code: 8, name: "LONAS" },
    Subgroup { group_code: 5, code: 9, name: "FLEXIVEL" },
    Subgroup { group_code: 5, code: 10, name: "CABO DE FREIO" },
    Subgroup { group_code: 6, code: 10, name: "ROLAMENTO" },
    Subgroup { group_code: 6, code: 11, name: "CUBO DE RODA" },
    Subgroup { group_code: 6, code: 12, name: "BIELETAS" },
    Subgroup { group_code: 6, code: 13, name: "BATENTE/COIFA" },
    Subgroup { group_code: 8, code: 2, name: "INATIVO" },
    Subgroup { group_code: 8, code: 3, name: "COXIM DE MOTOR" },
    Subgroup { group_code: 8, code: 4, name: "INATIVO" },
    Subgroup { group_code: 11, code: 2, name: "CABO DE EMBREAGEM" },
    Subgroup { group_code: 11, code: 3, name: "EMBREAGEM" },
    Subgroup { group_code: 11, code: 4, name: "CILINDRO DE EMBREAGEM" },
    Subgroup { group_code: 11, code: 5, name: "ROLAMENTO DE EMBREAGEM" },
    Subgroup { group_code: 11, code: 6, name: "GARFO DE EMBREAGEM" },
    Subgroup { group_code: 11, code: 7, name: "ATUADOR" },
    Subgroup { group_code: 6, code: 14, name: "JUNTA DESLIZANTE" },
    Subgroup { group_code: 6, code: 15, name: "TRIZETA" },
    Subgroup { group_code: 6, code: 16, name: "TULIPAS" },
    Subgroup { group_code: 10, code: 6, name: "BICOS INJETORES" },
    Subgroup { group_code: 10, code: 7, name: "REGULADOR DE PRESSAO" },
    Subgroup { group_code: 10, code: 8, name: "SENSOR DE POSICAO" },
    Subgroup { group_code: 10, code: 9, name: "SENSOR DE ROTACAO" },
    Subgroup { group_code: 10, code: 10, name: "SENSOR DE TEMPERATURA" },
    Subgroup { group_code: 10, code: 11, name: "SENSOR DE PRESSAO DE OLEO" },
    Subgroup { group_code: 10, code: 12, name: "SENSOR MAP" },
    Subgroup { group_code: 1, code: 19, name: "TAMPA DE OLEO" },
    Subgroup { group_code: 3, code: 10, name: "TAMPA DO RESERVATORIO" },
    Subgroup { group_code: 1, code: 20, name: "CORREIA DO ALTERNADOR" },
    Subgroup { group_code: 1, code: 21, name: "JUNTAS DIVERSAS" },
    Subgroup { group_code: 5, code: 11, name: "REPARO DA PINSA" },
    Subgroup { group_code: 1, code: 22, name: "POLIAS (VIRAB/BBA AGUA/DH)" },
    Subgroup { group_code: 1, code: 23, name: "RETENTORES" },
    Subgroup { group_code: 10, code: 13, name: "INTERRUPTOR DA DIRECAO HID." },
    Subgroup { group_code: 10, code: 14, name: "INTERRUPTOR DE FREIO" },
    Subgroup { group_code: 2, code: 10, name: "ATUADOR DA MARCHA LENTA" },
    Subgroup { group_code: 6, code: 17, name: "COIFA HOMOCINETICA" },
    Subgroup { group_code: 6, code: 18, name: "COXINS" },
    Subgroup { group_code: 13, code: 2, name: "PALHETA" },
    Subgroup { group_code: 10, code: 15, name: "SONDA LAMBDA" },
    Subgroup { group_code: 2, code: 11, name: "TAMPA DA BOMBA DE COMB." },
    Subgroup { group_code: 2, code: 12, name: "FLANGE DA BOMBA" },
    Subgroup { group_code: 6, code: 19, name: "BUCHAS" },
    Subgroup { group_code: 1, code: 24, name: "COMANDO DE VALVULAS" },
    Subgroup { group_code: 1, code: 25, name: "ANTI-CHA/VALV./COTOV./CARC./ENG.DIST." },
    Subgroup { group_code: 5, code: 12, name: "ALAVANCA DE FREIO" },
    Subgroup { group_code: 11, code: 8, name: "ALAVANCA DE CAMBIO" },
    Subgroup { group_code: 13, code: 3, name: "LAMPADAS" },
    Subgroup { group_code: 1, code: 26, name: "OLEO" },
    Subgroup { group_code: 5, code: 13, name: "OLEO DE FREIO" },
    Subgroup { group_code: 10, code: 16, name: "BATERIA" },
    Subgroup { group_code: 13, code: 4, name: "SPRAYS" },
    Subgroup { group_code: 1, code: 27, name: "COLAS E SILICONES" },
    Subgroup { group_code: 1, code: 28, name: "SELOS" },
    Subgroup { group_code: 1, code: 29, name: "VARETA DE OLEO" },
    Subgroup { group_code: 1, code: 30, name: "KIT DE MOTOR" },
    Subgroup { group_code: 10, code: 17, name: "PLUG ELETRONICO" },
    Subgroup { group_code: 1, code: 31, name: "JUNTA ADM/ESC" },
    Subgroup { group_code: 1, code: 32, name: "JUNTA TAMPA DE VALVULA" },
    Subgroup { group_code: 1, code: 33, name: "JUNTA DO CARTER" },
    Subgroup { group_code: 1, code: 34, name: "CALCO" },
    Subgroup { group_code: 10, code: 18, name: "MODULOS" },
    Subgroup { group_code: 6, code: 20, name: "PONTA DE EIXO" },
    Subgroup { group_code: 2, code: 13, name: "GUARNICAO DA TAMPA DA BOMB." },
    Subgroup { group_code: 2, code: 14, name: "PRE-FILTRO" },
    Subgroup { group_code: 1, code: 35, name: "HOMOGENIZADOR" },
    Subgroup { group_code: 2, code: 15, name: "BICO INJETOR" },
    Subgroup { group_code: 5, code: 14, name: "SERVO FREIO" },
    Subgroup { group_code: 6, code: 21, name: "AMORTECEDOR TAMPA TRASEIRA" },
    Subgroup { group_code: 11, code: 9, name: "JUNTA DE CAMBIO" },
    Subgroup { group_code: 1, code: 36, name: "KIT DA DISTRIBUICAO" },
    Subgroup { group_code: 3, code: 11, name: "TAMPA DO RADIADOR" },
    Subgroup { group_code: 1, code: 37, name: "BALANCIM" },
    Subgroup { group_code: 5, code: 15, name: "TAMBOR DE FREIO" },
    Subgroup { group_code: 1, code: 38, name: "RESFRIADOR DE OLEO" },
    Subgroup { group_code: 6, code: 22, name: "SEMI EIXO" },
    Subgroup { group_code: 1, code: 39, name: "TAMPA DA VALVULA" },
    Subgroup { group_code: 10, code: 19, name: "ELETROVENTILADOR" },
];

/// Icon for a subgroup label. An ordered, case-insensitive substring rule
/// list; the first matching rule wins (not the most specific one), with
/// `circle` as the final fallback.
pub fn icon_for_term(term: &str) -> &'static str {
    let t = term.to_uppercase();
    let has = |needle: &str| t.contains(needle);

    if has("INATIVO") || has("AJUSTAR") || has("CADASTRAR") {
        return "edit_off";
    }

    if has("ANEIS") {
        return "circle";
    }
    if has("PISTAO") || has("PISTOES") {
        return "memory";
    }
    if has("JUNTA") || has("RETENTOR") {
        return "layers";
    }
    if has("VALVULA") && has("CABECOTE") {
        return "valve";
    }
    if has("BOMBA") && has("OLEO") {
        return "oil_barrel";
    }
    if has("FILTRO") && has("OLEO") {
        return "filter_alt";
    }
    if has("CORREIA") {
        return "all_inclusive";
    }
    if has("CAMISA") {
        return "view_week";
    }
    if has("BRONZINA") {
        return "settings_input_component";
    }
    if has("CARTER") {
        return "inbox";
    }
    if has("COMANDO") {
        return "settings_applications";
    }
    if has("TUCHO") || has("BALANCIM") {
        return "smart_button";
    }
    if has("VARETA") {
        return "linear_scale";
    }
    if has("SELO") {
        return "verified";
    }
    if has("COLA") || has("SILICONE") {
        return "vaccines";
    }

    if has("RADIADOR") {
        return "grid_on";
    }
    if has("BOMBA") && has("AGUA") {
        return "water_drop";
    }
    if has("RESERVATORIO") {
        return "propane_tank";
    }
    if has("TERMOSTATICA") {
        return "device_thermostat";
    }
    if has("MANGUEIRA") {
        return "gesture";
    }
    if has("ELETROVENTILADOR") {
        return "mode_fan";
    }

    if has("BICO") {
        return "colorize";
    }
    if has("CARBURADOR") {
        return "settings_input_composite";
    }
    if has("FILTRO") && has("AR") {
        return "air";
    }
    if has("FILTRO") && has("COMBUSTIVEL") {
        return "filter_alt_off";
    }
    if has("BOMBA") && has("COMBUSTIVEL") {
        return "local_gas_station";
    }

    if has("PASTILHA") {
        return "rectangle";
    }
    if has("DISCO") {
        return "disc_full";
    }
    if has("CILINDRO") {
        return "cylinder";
    }
    if has("SAPATA") || has("LONA") {
        return "incomplete_circle";
    }
    if has("TAMBOR") {
        return "radio_button_unchecked";
    }
    if has("SERVO") {
        return "power_input";
    }
    if has("FLEXIVEL") {
        return "cable";
    }

    if has("AMORTECEDOR") {
        return "compress";
    }
    if has("MOLA") {
        return "waves";
    }
    if has("PIVO") {
        return "radio_button_checked";
    }
    if has("TERMINAL") || has("BIELETA") {
        return "linear_scale";
    }
    if has("BANDEJA") || has("BRACO") {
        return "change_history";
    }
    if has("HOMOCINETICA") || has("TRIZETA") {
        return "settings_system_daydream";
    }
    if has("ROLAMENTO") {
        return "donut_small";
    }
    if has("CUBO") {
        return "settings_brightness";
    }
    if has("CAIXA") && has("DIRECAO") {
        return "agriculture";
    }
    if has("COXIM") || has("BUCHA") {
        return "vibration";
    }

    if has("BATERIA") {
        return "battery_full";
    }
    if has("VELA") {
        return "flash_on";
    }
    if has("CABO") && has("VELA") {
        return "cable";
    }
    if has("BOBINA") {
        return "electric_bolt";
    }
    if has("ALTERNADOR") || has("MOTOR PARTIDA") {
        return "cyclone";
    }
    if has("LAMPADA") || has("FAROL") {
        return "lightbulb";
    }
    if has("SENSOR") || has("SONDA") {
        return "sensors";
    }
    if has("INTERRUPTOR") {
        return "toggle_on";
    }
    if has("MODULO") {
        return "developer_board";
    }
    if has("FUSIVEL") {
        return "power";
    }

    if has("EMBREAGEM") || has("KIT") {
        return "album";
    }
    if has("ATUADOR") {
        return "settings_power";
    }
    if has("ENGRENAGEM") {
        return "settings";
    }
    if has("ALAVANCA") {
        return "joystick";
    }

    if has("PALHETA") {
        return "wiper";
    }
    if has("SPRAY") || has("OLEO") || has("LUBRIFICANTE") {
        return "cleaning_services";
    }
    if has("PARAFUSO") || has("PORCA") {
        return "more_horiz";
    }

    if has("TAMPA") {
        return "expand_less";
    }
    if has("CABO") {
        return "cable";
    }
    if has("REPARO") {
        return "build";
    }

    "circle"
}

/// Icons for the top-level groups, keyed by group code.
pub fn group_icon(code: i64) -> &'static str {
    match code {
        1 => "car_repair",
        2 => "local_gas_station",
        3 => "mode_fan",
        4 => "album",
        5 => "motion_photos_on",
        6 => "height",
        7 => "layers",
        8 => "block",
        9 => "category",
        10 => "bolt",
        11 => "settings",
        12 => "device_hub",
        13 => "extension",
        _ => "inventory_2",
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Subcategory {
    pub id: String,
    pub name: String,
    pub count: i64,
    pub icon: &'static str,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Category {
    pub id: String,
    pub db_code: i64,
    pub label: String,
    pub icon: &'static str,
    pub count: i64,
    pub subcategories: Vec<Subcategory>,
}

/// Joins subgroups to their group on group code (order-independent) and
/// derives the placeholder counts: `((code * 23) % 200) + 10` per
/// subcategory and `((code * 15) % 100) + 5` summed per group. A group
/// with no subgroups yields an empty list and count 0.
pub fn build_categories(groups: &[Group], subgroups: &[Subgroup]) -> Vec<Category> {
    groups
        .iter()
        .map(|group| {
            let members: Vec<&Subgroup> = subgroups
                .iter()
                .filter(|sg| sg.group_code == group.code)
                .collect();

            let total: i64 = members.iter().map(|sg| ((sg.code * 15) % 100) + 5).sum();

            let subcategories = members
                .iter()
                .map(|sg| Subcategory {
                    id: sg.code.to_string(),
                    name: sg.name.to_string(),
                    count: ((sg.code * 23) % 200) + 10,
                    icon: icon_for_term(sg.name),
                })
                .collect();

            Category {
                id: group.code.to_string(),
                db_code: group.code,
                label: group.name.to_string(),
                icon: group_icon(group.code),
                count: total,
                subcategories,
            }
        })
        .collect()
}

/// The shipped reference tables joined into the browse tree.
pub fn default_catalog() -> Vec<Category> {
    build_categories(GROUPS, SUBGROUPS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_is_order_independent() {
        let groups = [Group { code: 5, name: "FREIOS" }];
        let forward = [
            Subgroup { group_code: 5, code: 4, name: "PASTILHA DE FREIO" },
            Subgroup { group_code: 5, code: 6, name: "DISCO" },
            Subgroup { group_code: 9, code: 1, name: "CADASTRAR SUBGRUPO" },
        ];
        let reversed = [forward[2], forward[1], forward[0]];

        let a = build_categories(&groups, &forward);
        let b = build_categories(&groups, &reversed);
        assert_eq!(a[0].count, b[0].count);
        assert_eq!(a[0].subcategories.len(), 2);
        assert_eq!(b[0].subcategories.len(), 2);
    }

    #[test]
    fn group_without_subgroups_is_empty_with_zero_count() {
        let groups = [Group { code: 12, name: "DIFERENCIAL" }];
        let built = build_categories(&groups, &[]);
        assert_eq!(built[0].count, 0);
        assert!(built[0].subcategories.is_empty());
    }

    #[test]
    fn counts_are_deterministic() {
        let first = default_catalog();
        let second = default_catalog();
        assert_eq!(first, second);

        // ((4 * 23) % 200) + 10 for PASTILHA DE FREIO (code 4).
        let freios = first.iter().find(|c| c.label == "FREIOS").expect("group");
        let pastilha = freios
            .subcategories
            .iter()
            .find(|s| s.name == "PASTILHA DE FREIO")
            .expect("subgroup");
        assert_eq!(pastilha.count, 102);
    }

    #[test]
    fn icon_rules_are_first_match_wins() {
        // JUNTA matches before the VALVULA+CABECOTE compound rule.
        assert_eq!(icon_for_term("JUNTA TAMPA DE VALVULA"), "layers");
        // Administrative entries take the very first rule.
        assert_eq!(icon_for_term("CADASTRAR SUBGRUPO"), "edit_off");
        // Compound rules require both substrings.
        assert_eq!(icon_for_term("VALVULAS DO CABECOTE"), "valve");
        assert_eq!(icon_for_term("BOMBA AGUA"), "water_drop");
        // Unknown labels fall through to the default.
        assert_eq!(icon_for_term("PECA DESCONHECIDA"), "circle");
    }

    #[test]
    fn matching_is_case_insensitive() {
        assert_eq!(icon_for_term("pastilha de freio"), "rectangle");
    }
}
