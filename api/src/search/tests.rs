use super::*;

fn params() -> RawSearchParams {
    RawSearchParams::default()
}

fn parse(params: &RawSearchParams) -> FilterTokens {
    parse_params(params, "ganesha").unwrap()
}

// ============ Region ============

#[test]
fn test_region_is_case_insensitive_and_normalized() {
    assert_eq!(parse(&params()).region, Region::Ganesha);
    assert_eq!(
        parse_params(&params(), "JaTiNaNgOr").unwrap().region,
        Region::Jatinangor
    );
    assert_eq!(Region::Ganesha.to_string(), "GANESHA");
}

#[test]
fn test_unknown_region_is_not_found() {
    for region in ["", "bandung", "ganesha ", "ganesh", "GANESHA2"] {
        let result = parse_params(&params(), region);
        assert!(
            matches!(result, Err(SearchError::NotFound(_))),
            "region {:?} should be rejected",
            region
        );
    }
}

#[test]
fn test_unknown_region_wins_over_invalid_parameters() {
    let raw = RawSearchParams {
        sort_status: Some("xyz".to_string()),
        ..params()
    };
    assert!(matches!(
        parse_params(&raw, "bandung"),
        Err(SearchError::NotFound(_))
    ));
}

// ============ Multi-valued filters ============

#[test]
fn test_absent_tag_filters_are_absent() {
    let tokens = parse(&params());
    assert_eq!(tokens.categories, None);
    assert_eq!(tokens.platforms, None);
    assert_eq!(tokens.payment_methods, None);
}

#[test]
fn test_tag_filters_split_on_semicolon() {
    let raw = RawSearchParams {
        filter_category: Some("Ayam;nasi".to_string()),
        filter_platform: Some("gofood".to_string()),
        filter_payment: Some("cash; QRIS".to_string()),
        ..params()
    };
    let tokens = parse(&raw);
    assert_eq!(
        tokens.categories,
        Some(vec!["ayam".to_string(), "nasi".to_string()])
    );
    assert_eq!(tokens.platforms, Some(vec!["gofood".to_string()]));
    assert_eq!(
        tokens.payment_methods,
        Some(vec!["cash".to_string(), "qris".to_string()])
    );
}

#[test]
fn test_empty_tag_filter_is_treated_as_absent() {
    for value in ["", ";", " ; ;; "] {
        let raw = RawSearchParams {
            filter_category: Some(value.to_string()),
            ..params()
        };
        assert_eq!(parse(&raw).categories, None, "value {:?}", value);
    }
}

#[test]
fn test_split_tag_names_drops_duplicates() {
    assert_eq!(
        split_tag_names("ayam;;Nasi ; AYAM"),
        vec!["ayam".to_string(), "nasi".to_string()]
    );
}

// ============ Price ============

#[test]
fn test_price_pair() {
    let raw = RawSearchParams {
        filter_price: Some("10000;25000".to_string()),
        ..params()
    };
    let tokens = parse(&raw);
    assert_eq!(tokens.price_min, Some(10000.0));
    assert_eq!(tokens.price_max, Some(25000.0));
}

#[test]
fn test_price_missing_components_leave_bound_absent() {
    let cases = [
        ("5000", Some(5000.0), None),
        ("5000;", Some(5000.0), None),
        (";7500", None, Some(7500.0)),
        ("", None, None),
        (" 12.5 ; 30 ", Some(12.5), Some(30.0)),
    ];
    for (value, min, max) in cases {
        let raw = RawSearchParams {
            filter_price: Some(value.to_string()),
            ..params()
        };
        let tokens = parse(&raw);
        assert_eq!(tokens.price_min, min, "value {:?}", value);
        assert_eq!(tokens.price_max, max, "value {:?}", value);
    }
}

#[test]
fn test_inverted_price_range_is_not_an_error() {
    let raw = RawSearchParams {
        filter_price: Some("30000;10000".to_string()),
        ..params()
    };
    let tokens = parse(&raw);
    assert_eq!(tokens.price_min, Some(30000.0));
    assert_eq!(tokens.price_max, Some(10000.0));
}

#[test]
fn test_invalid_price_is_validation_error() {
    for value in ["abc", "10;xyz", "ten;20", "-5", "NaN", "inf;10", "1;2;3"] {
        let raw = RawSearchParams {
            filter_price: Some(value.to_string()),
            ..params()
        };
        assert!(
            matches!(
                parse_params(&raw, "ganesha"),
                Err(SearchError::Validation(_))
            ),
            "value {:?} should be rejected",
            value
        );
    }
}

// ============ Search ============

#[test]
fn test_search_term_passes_through_verbatim() {
    let raw = RawSearchParams {
        search: Some(" Bakar 50%".to_string()),
        ..params()
    };
    assert_eq!(parse(&raw).search, Some(" Bakar 50%".to_string()));
}

#[test]
fn test_empty_search_is_absent() {
    let raw = RawSearchParams {
        search: Some(String::new()),
        ..params()
    };
    assert_eq!(parse(&raw).search, None);
}

// ============ Sorting ============

#[test]
fn test_sort_defaults() {
    let tokens = parse(&params());
    assert_eq!(tokens.sort_field, SortField::Rating);
    assert_eq!(tokens.sort_direction, None);

    let raw = RawSearchParams {
        sort_data: Some(String::new()),
        sort_status: Some(String::new()),
        ..params()
    };
    let tokens = parse(&raw);
    assert_eq!(tokens.sort_field, SortField::Rating);
    assert_eq!(tokens.sort_direction, None);
}

#[test]
fn test_sort_values() {
    let raw = RawSearchParams {
        sort_data: Some("distance".to_string()),
        sort_status: Some("asc".to_string()),
        ..params()
    };
    let tokens = parse(&raw);
    assert_eq!(tokens.sort_field, SortField::Distance);
    assert_eq!(tokens.sort_direction, Some(SortDirection::Asc));

    let raw = RawSearchParams {
        sort_data: Some("price".to_string()),
        sort_status: Some("desc".to_string()),
        ..params()
    };
    let tokens = parse(&raw);
    assert_eq!(tokens.sort_field, SortField::Price);
    assert_eq!(tokens.sort_direction, Some(SortDirection::Desc));
}

#[test]
fn test_invalid_sort_status_is_validation_error() {
    for value in ["xyz", "ASC", "ascending", " asc"] {
        let raw = RawSearchParams {
            sort_status: Some(value.to_string()),
            ..params()
        };
        assert!(
            matches!(
                parse_params(&raw, "ganesha"),
                Err(SearchError::Validation(_))
            ),
            "sort_status {:?} should be rejected",
            value
        );
    }
}

#[test]
fn test_invalid_sort_data_is_validation_error() {
    for value in ["name", "Rating", "popularity"] {
        let raw = RawSearchParams {
            sort_data: Some(value.to_string()),
            ..params()
        };
        let err = parse_params(&raw, "ganesha").unwrap_err();
        assert!(matches!(err, SearchError::Validation(_)));
        assert!(err.to_string().contains("rating, distance, price"));
    }
}

// ============ Compiler ============

#[test]
fn test_region_only_scenario() {
    let spec = compile(&parse(&params()));
    assert_eq!(spec.region, Region::Ganesha);
    assert!(spec.is_unfiltered());
    assert_eq!(
        spec.order,
        OrderClause {
            field: SortField::Rating,
            direction: None
        }
    );
}

#[test]
fn test_price_clause_is_inclusive_pair() {
    let raw = RawSearchParams {
        filter_price: Some("10000;25000".to_string()),
        ..params()
    };
    let spec = compile(&parse(&raw));
    assert_eq!(
        spec.price,
        Some(PriceClause {
            min: Some(10000.0),
            max: Some(25000.0)
        })
    );
    assert!(spec.search.is_none());
    assert_eq!(spec.membership_clauses().count(), 0);
}

#[test]
fn test_category_and_search_scenario() {
    let raw = RawSearchParams {
        filter_category: Some("ayam;nasi".to_string()),
        search: Some("bakar".to_string()),
        ..params()
    };
    let spec = compile(&parse(&raw));
    assert_eq!(
        spec.categories,
        Some(MembershipClause {
            dimension: TagDimension::Category,
            names: vec!["ayam".to_string(), "nasi".to_string()],
        })
    );
    assert_eq!(
        spec.search,
        Some(SearchClause {
            term: "bakar".to_string(),
            targets: vec![
                SearchTarget::Name,
                SearchTarget::Description,
                SearchTarget::CategoryTag
            ],
        })
    );
    assert!(spec.platforms.is_none());
    assert!(spec.payment_methods.is_none());
    assert!(spec.price.is_none());
}

#[test]
fn test_sort_scenario() {
    let raw = RawSearchParams {
        sort_data: Some("distance".to_string()),
        sort_status: Some("asc".to_string()),
        ..params()
    };
    let spec = compile(&parse(&raw));
    assert_eq!(
        spec.order,
        OrderClause {
            field: SortField::Distance,
            direction: Some(SortDirection::Asc)
        }
    );
}

#[test]
fn test_compile_is_deterministic() {
    let raw = RawSearchParams {
        filter_category: Some("ayam".to_string()),
        filter_platform: Some("grabfood".to_string()),
        filter_payment: Some("cash".to_string()),
        filter_price: Some(";20000".to_string()),
        search: Some("geprek".to_string()),
        sort_data: Some("price".to_string()),
        sort_status: Some("desc".to_string()),
    };
    let tokens = parse(&raw);
    assert_eq!(compile(&tokens), compile(&tokens));
}

#[test]
fn test_compile_omits_empty_hand_built_dimensions() {
    let mut tokens = FilterTokens::for_region(Region::Jatinangor);
    tokens.categories = Some(Vec::new());
    tokens.search = Some(String::new());
    let spec = compile(&tokens);
    assert!(spec.is_unfiltered());
}

#[test]
fn test_compile_keeps_parsed_membership_names() {
    let raw = RawSearchParams {
        filter_platform: Some("GoFood;gofood ;ShopeeFood".to_string()),
        ..params()
    };
    let spec = compile(&parse(&raw));
    assert_eq!(
        spec.platforms.map(|clause| clause.names),
        Some(vec!["gofood".to_string(), "shopeefood".to_string()])
    );
}

#[test]
fn test_fold_case_handles_non_ascii() {
    assert_eq!(fold_case("CAFÉ ÜBER"), "café über");
    assert_eq!(split_tag_names("ÉCLAIR;éclair"), vec!["éclair".to_string()]);
}

// ============ SQL rendering ============

#[test]
fn test_render_region_only() {
    let fragment = render_sql(&compile(&parse(&params())));
    assert_eq!(fragment.where_clause, "places.region = ?");
    assert_eq!(fragment.order_clause, "ORDER BY places.rating, places.id");
    assert_eq!(fragment.binds, vec![SqlValue::Text("GANESHA".to_string())]);
}

#[test]
fn test_render_without_search_has_no_or_branch() {
    let raw = RawSearchParams {
        filter_category: Some("ayam".to_string()),
        filter_price: Some("1000;2000".to_string()),
        ..params()
    };
    let fragment = render_sql(&compile(&parse(&raw)));
    assert!(!fragment.where_clause.contains(" OR "));
    assert!(!fragment.where_clause.contains("LIKE"));
}

#[test]
fn test_render_binds_follow_placeholder_order() {
    let raw = RawSearchParams {
        filter_category: Some("ayam;nasi".to_string()),
        filter_payment: Some("qris".to_string()),
        filter_price: Some("10000;25000".to_string()),
        search: Some("Bakar".to_string()),
        sort_data: Some("price".to_string()),
        sort_status: Some("desc".to_string()),
        ..params()
    };
    let fragment = render_sql(&compile(&parse(&raw)));

    let placeholders = fragment.where_clause.matches('?').count();
    assert_eq!(placeholders, fragment.binds.len());
    assert_eq!(
        fragment.binds,
        vec![
            SqlValue::Text("GANESHA".to_string()),
            SqlValue::Text("%bakar%".to_string()),
            SqlValue::Text("%bakar%".to_string()),
            SqlValue::Text("%bakar%".to_string()),
            SqlValue::Text("ayam".to_string()),
            SqlValue::Text("nasi".to_string()),
            SqlValue::Text("qris".to_string()),
            SqlValue::Real(10000.0),
            SqlValue::Real(25000.0),
        ]
    );
    assert!(fragment.where_clause.contains("place_categories"));
    assert!(fragment.where_clause.contains("place_payment_methods"));
    assert!(!fragment.where_clause.contains("place_platforms"));
    assert_eq!(
        fragment.order_clause,
        "ORDER BY places.price DESC, places.id"
    );
}

#[test]
fn test_render_escapes_like_wildcards() {
    let raw = RawSearchParams {
        search: Some("50%_off\\".to_string()),
        ..params()
    };
    let fragment = render_sql(&compile(&parse(&raw)));
    assert_eq!(
        fragment.binds[1],
        SqlValue::Text("%50\\%\\_off\\\\%".to_string())
    );
}

#[test]
fn test_render_compares_folded_columns() {
    let raw = RawSearchParams {
        filter_category: Some("Éclair".to_string()),
        search: Some("CAFÉ".to_string()),
        ..params()
    };
    let fragment = render_sql(&compile(&parse(&raw)));
    assert!(!fragment.where_clause.contains("LOWER("));
    assert!(fragment.where_clause.contains("places.name_search LIKE ?"));
    assert!(fragment.where_clause.contains("places.description_search LIKE ?"));
    assert_eq!(fragment.binds[1], SqlValue::Text("%café%".to_string()));
    assert_eq!(
        fragment.binds.last(),
        Some(&SqlValue::Text("éclair".to_string()))
    );
}
