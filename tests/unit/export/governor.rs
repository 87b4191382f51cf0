use super::*;

fn size(w: u32, h: u32) -> ExportSize {
    ExportSize::new(w, h).unwrap()
}

#[test]
fn requests_at_or_below_the_ceiling_proceed_unchanged() {
    assert_eq!(
        govern(size(4100, 5840)),
        ExportDecision::Proceed {
            size: size(4100, 5840)
        }
    );
    assert_eq!(
        govern(size(5000, 5000)),
        ExportDecision::Proceed {
            size: size(5000, 5000)
        }
    );
}

#[test]
fn oversize_requests_wait_for_a_decision() {
    let ExportDecision::Confirm { pending } = govern(size(5000, 5001)) else {
        panic!("expected confirmation");
    };
    assert_eq!(pending.requested(), size(5000, 5001));
}

#[test]
fn downscale_fixes_the_width_and_keeps_the_aspect() {
    let ExportDecision::Confirm { pending } = govern(size(10000, 14240)) else {
        panic!("expected confirmation");
    };
    assert_eq!(pending.downscaled_size(), size(4100, 5838));
    assert_eq!(pending.downscale(), size(4100, 5838));
}

#[test]
fn proceeding_anyway_keeps_the_requested_size() {
    let ExportDecision::Confirm { pending } = govern(size(8310, 11790)) else {
        panic!("expected confirmation");
    };
    assert_eq!(pending.proceed_anyway(), size(8310, 11790));
}
