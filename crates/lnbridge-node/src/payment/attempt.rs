use lnbridge_core::rpc::router::SendPaymentRequest;

/// One round of the retry state machine.
///
/// Both flags only ever go from `true` to `false`, so a payment is attempted
/// at most three times: initial, after a routing-data reset, after an edge
/// refresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentAttempt {
    pub request: SendPaymentRequest,
    pub allow_reset: bool,
    pub allow_edge_refresh: bool,
}

impl PaymentAttempt {
    pub fn initial(request: SendPaymentRequest, allow_reset: bool, allow_edge_refresh: bool) -> Self {
        Self {
            request,
            allow_reset,
            allow_edge_refresh,
        }
    }

    pub fn without_reset(self) -> Self {
        Self {
            allow_reset: false,
            ..self
        }
    }

    pub fn without_edge_refresh(self) -> Self {
        Self {
            allow_edge_refresh: false,
            ..self
        }
    }

    /// No corrective side effect left to try.
    pub fn is_leaf(&self) -> bool {
        !self.allow_reset && !self.allow_edge_refresh
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_only_move_down() {
        let a = PaymentAttempt::initial(SendPaymentRequest::default(), true, true);
        assert!(!a.is_leaf());

        let b = a.clone().without_reset();
        assert!(!b.allow_reset);
        assert!(b.allow_edge_refresh);
        assert_eq!(b.request, a.request);

        let c = b.without_edge_refresh();
        assert!(c.is_leaf());
        assert!(c.clone().without_reset().is_leaf());
    }

    #[test]
    fn disabled_options_start_at_leaf() {
        let a = PaymentAttempt::initial(SendPaymentRequest::default(), false, false);
        assert!(a.is_leaf());
    }
}
