use proptest::prelude::*;

pub(crate) fn number_strategy() -> impl Strategy<Value = String> {
    (0u16..=100).prop_map(|n| n.to_string())
}

pub(crate) fn sides_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        4 => (2u16..=20).prop_map(|s| s.to_string()),
        1 => prop_oneof![Just("f"), Just("F")].prop_map(String::from),
    ]
}

pub(crate) fn dice_strategy() -> impl Strategy<Value = String> {
    (1u16..=10, sides_strategy(), any::<bool>()).prop_map(|(count, sides, explode)| {
        let bang = if explode { "!" } else { "" };
        format!("{}d{}{}", count, sides, bang)
    })
}

pub(crate) fn dice_with_mode_strategy() -> impl Strategy<Value = String> {
    (
        dice_strategy(),
        prop_oneof![Just("kh"), Just("kl"), Just("dh"), Just("dl")],
        1u16..=10,
    )
        .prop_map(|(dice, mode, n)| format!("{}{}{}", dice, mode, n))
}

pub(crate) fn parenthesized_strategy(
    inner: impl Strategy<Value = String>,
) -> impl Strategy<Value = String> {
    inner.prop_map(|expr| format!("({})", expr))
}

pub(crate) fn binary_operation_strategy(
    left: impl Strategy<Value = String>,
    right: impl Strategy<Value = String>,
) -> impl Strategy<Value = String> {
    (
        left,
        prop_oneof![Just("+"), Just("-"), Just("*"), Just("/")],
        right,
        any::<bool>(),
    )
        .prop_map(|(l, op, r, spaced)| {
            if spaced {
                format!("{} {} {}", l, op, r)
            } else {
                format!("{}{}{}", l, op, r)
            }
        })
}

/// Syntactically valid expressions; evaluation may still divide by zero.
pub(crate) fn dice_expression_strategy() -> impl Strategy<Value = String> {
    let leaf = prop_oneof![
        number_strategy(),
        dice_strategy(),
        dice_with_mode_strategy(),
    ];

    leaf.prop_recursive(4, 24, 8, |inner| {
        prop_oneof![
            parenthesized_strategy(inner.clone()),
            binary_operation_strategy(inner.clone(), inner),
        ]
    })
}
