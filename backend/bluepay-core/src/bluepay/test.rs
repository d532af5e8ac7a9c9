#[cfg(test)]
mod test {
    use std::{
        collections::VecDeque,
        sync::{Arc, Mutex},
    };

    use async_trait::async_trait;
    use bytes::Bytes;
    use cards::CardExpiration;
    use common_enums::{AttemptStatus, CaptureMethod, Currency, RefundStatus};
    use common_utils::{
        masking::{PeekInterface, Secret},
        request::Request,
        types::{AmountConvertor, MinorUnit, StringMajorUnitForConnector},
        CustomResult,
    };
    use error_stack::report;

    use crate::{
        bluepay::{constants, transformers::*, Bluepay},
        errors::ApiClientError,
        service::GatewayTransport,
        types::{ConnectorParams, Response},
    };

    const SALE_TPS: &str = "913EC297D8024F9E277EF68553CFBD3A";
    const AUTH_TPS: &str = "AC213ABA5862AB4D3D0145A11EE19EF4";
    const FULL_REFUND_TPS: &str = "52AE7AE11E30ACBBDFE6835E6249E572";
    const ADMIN_GET_TPS: &str = "AC1987E2043D6365148BB94CC2C6466D";
    const NOTIFICATION_STAMP: &str = "501086DDDDE28E450336FAC93B25F8FC";

    fn auth() -> BluepayAuthType {
        BluepayAuthType::new(
            Secret::new("acctid".to_string()),
            Secret::new("1001".to_string()),
            Secret::new("secretkey".to_string()),
        )
    }

    fn card() -> CardDetails {
        CardDetails {
            card_number: "4111111111111111".parse().expect("valid card"),
            expiry: CardExpiration::new(3, 2099).expect("valid expiry"),
            cvv2: Secret::new("123".to_string()),
        }
    }

    fn payment_data(capture_method: CaptureMethod) -> PaymentsAuthorizeData {
        PaymentsAuthorizeData {
            amount: MinorUnit::new(10000),
            currency: Currency::USD,
            card: card(),
            billing: BillingContact {
                first_name: Some(Secret::new("John".to_string())),
                last_name: Some(Secret::new("Doe".to_string())),
                address1: Some(Secret::new("10 Main St".to_string())),
                city: Some("Chicago".to_string()),
                state: Some("IL".to_string()),
                country: Some("USA".to_string()),
                zip: Some(Secret::new("60601".to_string())),
                email: Some(Secret::new("john@example.com".to_string())),
                ..Default::default()
            },
            capture_method,
            customer_ip: Some("203.0.113.7".to_string()),
            custom_id: Some("42".to_string()),
            custom_id2: None,
            order_id: Some("order-42".to_string()),
            invoice_id: Some("order-42".to_string()),
            rebill: None,
        }
    }

    fn encode<T: serde::Serialize>(request: &T) -> String {
        serde_urlencoded::to_string(request).expect("request serializes")
    }

    #[test]
    fn test_constants() {
        assert_eq!(constants::PROTOCOL_VERSION, "3");
        assert_eq!(
            constants::TPS_DEF,
            "ACCOUNT_ID MODE TRANS_TYPE AMOUNT MASTER_ID"
        );
        assert_eq!(constants::PAYMENT_TYPE_CREDIT, "CREDIT");
        assert_eq!(constants::DO_REBILL, "1");
        assert_eq!(constants::REBILL_STOP_STATUS, "STOPPED");
        assert_eq!(constants::DUPLICATE_MESSAGE, "DUPLICATE");
    }

    #[test]
    fn primary_seal_matches_reference_vector() {
        // md5("secretkey" + "acctid" + "TEST" + "SALE" + "100.00" + "")
        let credentials = auth();
        let amount = StringMajorUnitForConnector
            .convert(MinorUnit::new(10000), Currency::USD)
            .expect("conversion");
        let seal = primary_tamper_proof_seal(
            &credentials.secret_key,
            &credentials.account_id,
            BluepayMode::Test,
            TransactionType::Sale,
            Some(&amount),
            None,
        )
        .expect("seal");
        assert_eq!(seal.peek(), SALE_TPS);
    }

    #[test]
    fn primary_seal_is_sensitive_to_every_input() {
        let credentials = auth();
        let amount = StringMajorUnitForConnector
            .convert(MinorUnit::new(10000), Currency::USD)
            .expect("conversion");
        let base = primary_tamper_proof_seal(
            &credentials.secret_key,
            &credentials.account_id,
            BluepayMode::Test,
            TransactionType::Sale,
            Some(&amount),
            None,
        )
        .expect("seal");

        let other_key = primary_tamper_proof_seal(
            &Secret::new("secretkex".to_string()),
            &credentials.account_id,
            BluepayMode::Test,
            TransactionType::Sale,
            Some(&amount),
            None,
        )
        .expect("seal");
        let other_mode = primary_tamper_proof_seal(
            &credentials.secret_key,
            &credentials.account_id,
            BluepayMode::Live,
            TransactionType::Sale,
            Some(&amount),
            None,
        )
        .expect("seal");
        let other_type = primary_tamper_proof_seal(
            &credentials.secret_key,
            &credentials.account_id,
            BluepayMode::Test,
            TransactionType::Auth,
            Some(&amount),
            None,
        )
        .expect("seal");
        let other_amount = StringMajorUnitForConnector
            .convert(MinorUnit::new(10001), Currency::USD)
            .expect("conversion");
        let other_amount_seal = primary_tamper_proof_seal(
            &credentials.secret_key,
            &credentials.account_id,
            BluepayMode::Test,
            TransactionType::Sale,
            Some(&other_amount),
            None,
        )
        .expect("seal");
        let with_master = primary_tamper_proof_seal(
            &credentials.secret_key,
            &credentials.account_id,
            BluepayMode::Test,
            TransactionType::Sale,
            Some(&amount),
            Some("9001"),
        )
        .expect("seal");

        for other in [
            &other_key,
            &other_mode,
            &other_type,
            &other_amount_seal,
            &with_master,
        ] {
            assert_ne!(base.peek(), other.peek());
        }
        assert_eq!(other_type.peek(), AUTH_TPS);
    }

    #[test]
    fn admin_seal_matches_reference_vector() {
        // md5("secretkey" + "acctid" + "GET" + "200456")
        let credentials = auth();
        let seal = rebill_admin_seal(
            &credentials.secret_key,
            &credentials.account_id,
            AdminVerb::Get,
            "200456",
        )
        .expect("seal");
        assert_eq!(seal.peek(), ADMIN_GET_TPS);
    }

    #[test]
    fn sale_request_carries_protocol_fields_and_seal() {
        let data = payment_data(CaptureMethod::Automatic);
        let request = BluepayPaymentsRequest::try_from(BluepayRouterData {
            auth: &auth(),
            mode: BluepayMode::Test,
            request: &data,
        })
        .expect("request builds");
        let body = encode(&request);

        assert!(body.contains("PAYMENT_TYPE=CREDIT"));
        assert!(body.contains("AMOUNT=100.00"));
        assert!(body.contains("PAYMENT_ACCOUNT=4111111111111111"));
        assert!(body.contains("CARD_EXPIRE=0399"));
        assert!(body.contains("TRANS_TYPE=SALE"));
        assert!(body.contains("MODE=TEST"));
        assert!(body.contains("VERSION=3"));
        assert!(body.contains("TPS_DEF=ACCOUNT_ID+MODE+TRANS_TYPE+AMOUNT+MASTER_ID"));
        assert!(body.contains(&format!("TAMPER_PROOF_SEAL={SALE_TPS}")));
    }

    #[test]
    fn manual_capture_requests_an_authorization() {
        let data = payment_data(CaptureMethod::Manual);
        let request = BluepayPaymentsRequest::try_from(BluepayRouterData {
            auth: &auth(),
            mode: BluepayMode::Test,
            request: &data,
        })
        .expect("request builds");
        let body = encode(&request);

        assert!(body.contains("TRANS_TYPE=AUTH"));
        assert!(body.contains(&format!("TAMPER_PROOF_SEAL={AUTH_TPS}")));
    }

    #[test]
    fn recurring_schedule_forces_sale_and_adds_rebill_fields() {
        let mut data = payment_data(CaptureMethod::Manual);
        data.rebill = Some(RebillSchedule {
            first_date: RebillFirstDate::On(time::macros::date!(2026 - 09 - 01)),
            expression: RebillExpression {
                length: 1,
                period: RebillPeriod::Month,
            },
            cycles: Some(11),
            amount: MinorUnit::new(2500),
        });
        let request = BluepayPaymentsRequest::try_from(BluepayRouterData {
            auth: &auth(),
            mode: BluepayMode::Test,
            request: &data,
        })
        .expect("request builds");
        let body = encode(&request);

        assert!(body.contains("TRANS_TYPE=SALE"));
        assert!(body.contains("DO_REBILL=1"));
        assert!(body.contains("REB_FIRST_DATE=2026-09-01"));
        assert!(body.contains("REB_EXPR=1+MONTH"));
        assert!(body.contains("REB_CYCLES=11"));
        assert!(body.contains("REB_AMOUNT=25.00"));
    }

    #[test]
    fn relative_rebill_first_date_serializes_as_expression() {
        let mut data = payment_data(CaptureMethod::Automatic);
        data.rebill = Some(RebillSchedule {
            first_date: RebillFirstDate::After(RebillExpression {
                length: 2,
                period: RebillPeriod::Week,
            }),
            expression: RebillExpression {
                length: 2,
                period: RebillPeriod::Week,
            },
            cycles: None,
            amount: MinorUnit::new(999),
        });
        let request = BluepayPaymentsRequest::try_from(BluepayRouterData {
            auth: &auth(),
            mode: BluepayMode::Test,
            request: &data,
        })
        .expect("request builds");
        let body = encode(&request);

        assert!(body.contains("REB_FIRST_DATE=2+WEEK"));
        assert!(!body.contains("REB_CYCLES="));
    }

    #[test]
    fn full_refund_omits_the_amount_field() {
        let data = RefundsData {
            master_id: "9001".to_string(),
            amount: None,
            currency: Currency::USD,
        };
        let request = BluepayRefundRequest::try_from(BluepayRouterData {
            auth: &auth(),
            mode: BluepayMode::Test,
            request: &data,
        })
        .expect("request builds");
        let body = encode(&request);

        assert!(!body.contains("AMOUNT="));
        assert!(body.contains("MASTER_ID=9001"));
        assert!(body.contains("TRANS_TYPE=REFUND"));
        assert!(body.contains(&format!("TAMPER_PROOF_SEAL={FULL_REFUND_TPS}")));
    }

    #[test]
    fn partial_refund_carries_a_two_decimal_amount() {
        let data = RefundsData {
            master_id: "9001".to_string(),
            amount: Some(MinorUnit::new(1250)),
            currency: Currency::USD,
        };
        let request = BluepayRefundRequest::try_from(BluepayRouterData {
            auth: &auth(),
            mode: BluepayMode::Test,
            request: &data,
        })
        .expect("request builds");
        let body = encode(&request);

        assert!(body.contains("AMOUNT=12.50"));
    }

    #[test]
    fn void_request_signs_the_master_id() {
        let data = PaymentVoidData {
            master_id: "9001".to_string(),
        };
        let request = BluepayVoidRequest::try_from(BluepayRouterData {
            auth: &auth(),
            mode: BluepayMode::Live,
            request: &data,
        })
        .expect("request builds");
        let body = encode(&request);

        assert!(body.contains("TRANS_TYPE=VOID"));
        assert!(body.contains("MODE=LIVE"));
        // md5("secretkey" + "acctid" + "LIVE" + "VOID" + "" + "9001")
        assert!(body.contains("TAMPER_PROOF_SEAL=3104842145D87BBDCE0305C97AB61D4B"));
    }

    #[test]
    fn approved_response_is_successful() {
        let response: BluepayPaymentsResponse = serde_urlencoded::from_bytes(
            b"STATUS=1&MESSAGE=APPROVED&TRANS_ID=100123&AVS=Y&CVV2=M&AUTH_CODE=ABC123",
        )
        .expect("response parses");
        assert_eq!(response.outcome(), TransactionOutcome::Approved);
        assert!(response.outcome().is_successful());
    }

    #[test]
    fn duplicate_message_suppresses_an_approved_status() {
        let response: BluepayPaymentsResponse =
            serde_urlencoded::from_bytes(b"STATUS=1&MESSAGE=DUPLICATE&TRANS_ID=100123")
                .expect("response parses");
        assert_eq!(response.outcome(), TransactionOutcome::DuplicateSuppressed);
        assert!(!response.outcome().is_successful());
    }

    #[test]
    fn declined_and_error_statuses_map_to_their_outcomes() {
        let declined: BluepayPaymentsResponse =
            serde_urlencoded::from_bytes(b"STATUS=0&MESSAGE=DECLINED").expect("response parses");
        assert_eq!(declined.outcome(), TransactionOutcome::Declined);

        let error: BluepayPaymentsResponse =
            serde_urlencoded::from_bytes(b"STATUS=E&MESSAGE=Missing+ACCOUNT_ID")
                .expect("response parses");
        assert_eq!(error.outcome(), TransactionOutcome::Error);

        let empty: BluepayPaymentsResponse =
            serde_urlencoded::from_bytes(b"").expect("response parses");
        assert_eq!(empty.outcome(), TransactionOutcome::Error);
    }

    fn notification() -> NotificationParams {
        NotificationParams::from_urlencoded(
            format!(
                "BP_STAMP_DEF=trans_id+rebill_id+status&BP_STAMP={NOTIFICATION_STAMP}\
                 &trans_id=100123&rebill_id=200456&status=active"
            )
            .as_bytes(),
        )
        .expect("notification parses")
    }

    #[test]
    fn genuine_notification_stamp_verifies() {
        // md5("secretkey" + "100123" + "200456" + "active")
        let verified = verify_rebill_stamp(&auth().secret_key, &notification()).expect("verifies");
        assert!(verified);
    }

    #[test]
    fn mutated_stamp_is_rejected() {
        let params = NotificationParams::from_urlencoded(
            format!(
                "BP_STAMP_DEF=trans_id+rebill_id+status&BP_STAMP={}\
                 &trans_id=100123&rebill_id=200456&status=active",
                NOTIFICATION_STAMP.to_lowercase()
            )
            .as_bytes(),
        )
        .expect("notification parses");
        let verified = verify_rebill_stamp(&auth().secret_key, &params).expect("verifies");
        assert!(!verified);
    }

    #[test]
    fn mutated_stamped_field_is_rejected() {
        let params = NotificationParams::from_urlencoded(
            format!(
                "BP_STAMP_DEF=trans_id+rebill_id+status&BP_STAMP={NOTIFICATION_STAMP}\
                 &trans_id=100124&rebill_id=200456&status=active"
            )
            .as_bytes(),
        )
        .expect("notification parses");
        let verified = verify_rebill_stamp(&auth().secret_key, &params).expect("verifies");
        assert!(!verified);
    }

    #[test]
    fn notification_without_stamp_fields_is_an_error() {
        let params = NotificationParams::from_urlencoded(b"rebill_id=200456&status=active")
            .expect("notification parses");
        assert!(verify_rebill_stamp(&auth().secret_key, &params).is_err());
    }

    // ===== CLIENT FLOWS AGAINST A SCRIPTED TRANSPORT =====

    struct MockTransport {
        responses: Mutex<VecDeque<CustomResult<Result<Response, Response>, ApiClientError>>>,
        requests: Mutex<Vec<(String, String)>>,
    }

    impl MockTransport {
        fn new(
            responses: Vec<CustomResult<Result<Response, Response>, ApiClientError>>,
        ) -> Arc<Self> {
            Arc::new(Self {
                responses: Mutex::new(responses.into_iter().collect()),
                requests: Mutex::new(Vec::new()),
            })
        }

        fn recorded(&self) -> Vec<(String, String)> {
            self.requests.lock().expect("lock").clone()
        }
    }

    #[async_trait]
    impl GatewayTransport for MockTransport {
        async fn send(
            &self,
            request: Request,
        ) -> CustomResult<Result<Response, Response>, ApiClientError> {
            let body = request
                .body
                .map(|body| body.get_inner_value().peek().clone())
                .unwrap_or_default();
            self.requests
                .lock()
                .expect("lock")
                .push((request.url, body));
            self.responses
                .lock()
                .expect("lock")
                .pop_front()
                .expect("unexpected gateway call")
        }
    }

    fn ok_body(body: &'static [u8]) -> CustomResult<Result<Response, Response>, ApiClientError> {
        Ok(Ok(Response {
            response: Bytes::from_static(body),
            status_code: 200,
        }))
    }

    fn error_body(
        status_code: u16,
        body: &'static [u8],
    ) -> CustomResult<Result<Response, Response>, ApiClientError> {
        Ok(Err(Response {
            response: Bytes::from_static(body),
            status_code,
        }))
    }

    fn client(transport: Arc<MockTransport>) -> Bluepay {
        Bluepay::with_transport(
            auth(),
            BluepayMode::Test,
            ConnectorParams::default(),
            transport,
        )
    }

    #[tokio::test]
    async fn authorize_parses_an_approved_sale() {
        let transport = MockTransport::new(vec![ok_body(
            b"STATUS=1&MESSAGE=APPROVED&TRANS_ID=100123&AVS=Y&CVV2=M&AUTH_CODE=ABC123\
              &PAYMENT_ACCOUNT_MASK=4XXXXXXXXXXX1111&CARD_TYPE=VISA&CARD_COUNTRY=US\
              &BIN=411111&BANK_NAME=FIRST+TEST+BANK",
        )]);
        let result = client(Arc::clone(&transport))
            .authorize(&payment_data(CaptureMethod::Automatic))
            .await
            .expect("call succeeds");

        assert!(result.is_successful());
        assert_eq!(result.status, AttemptStatus::Charged);
        assert_eq!(result.transaction_id.as_deref(), Some("100123"));
        assert_eq!(result.auth_code.as_deref(), Some("ABC123"));
        assert_eq!(result.avs_code.as_deref(), Some("Y"));
        assert_eq!(result.cvv2_code.as_deref(), Some("M"));
        assert_eq!(result.card_type.as_deref(), Some("VISA"));
        assert_eq!(result.bank_name.as_deref(), Some("FIRST TEST BANK"));

        let recorded = transport.recorded();
        assert_eq!(recorded.len(), 1);
        assert_eq!(
            recorded[0].0,
            "https://secure.bluepay.com/interfaces/bp20post"
        );
    }

    #[tokio::test]
    async fn authorize_without_capture_reports_authorized() {
        let transport =
            MockTransport::new(vec![ok_body(b"STATUS=1&MESSAGE=APPROVED&TRANS_ID=100123")]);
        let result = client(transport)
            .authorize(&payment_data(CaptureMethod::Manual))
            .await
            .expect("call succeeds");

        assert_eq!(result.status, AttemptStatus::Authorized);
    }

    #[tokio::test]
    async fn duplicate_submission_is_not_successful() {
        let transport =
            MockTransport::new(vec![ok_body(b"STATUS=1&MESSAGE=DUPLICATE&TRANS_ID=100123")]);
        let result = client(transport)
            .authorize(&payment_data(CaptureMethod::Automatic))
            .await
            .expect("call succeeds");

        assert!(!result.is_successful());
        assert_eq!(result.outcome, TransactionOutcome::DuplicateSuppressed);
        assert_eq!(result.status, AttemptStatus::Failure);
    }

    #[tokio::test]
    async fn refund_maps_refund_status() {
        let transport =
            MockTransport::new(vec![ok_body(b"STATUS=1&MESSAGE=APPROVED&TRANS_ID=100999")]);
        let result = client(transport)
            .refund(&RefundsData {
                master_id: "9001".to_string(),
                amount: None,
                currency: Currency::USD,
            })
            .await
            .expect("call succeeds");

        assert_eq!(result.refund_status, RefundStatus::Success);
        assert_eq!(result.transaction_id.as_deref(), Some("100999"));
    }

    #[tokio::test]
    async fn cancel_recurring_skips_the_stop_for_terminal_sequences() {
        let transport = MockTransport::new(vec![ok_body(b"STATUS=deleted&REBILL_ID=200456")]);
        let result = client(Arc::clone(&transport))
            .cancel_recurring("200456")
            .await
            .expect("call succeeds");

        assert!(result.is_successful());
        assert_eq!(result.status, RebillStatus::Deleted);
        let recorded = transport.recorded();
        assert_eq!(recorded.len(), 1);
        assert!(recorded[0].1.contains("TRANS_TYPE=GET"));
        assert!(recorded[0]
            .0
            .ends_with("/interfaces/bp20rebadmin"));
    }

    #[tokio::test]
    async fn cancel_recurring_stops_an_active_sequence() {
        let transport = MockTransport::new(vec![
            ok_body(b"STATUS=active&REBILL_ID=200456"),
            ok_body(b"STATUS=stopped&REBILL_ID=200456"),
        ]);
        let result = client(Arc::clone(&transport))
            .cancel_recurring("200456")
            .await
            .expect("call succeeds");

        assert!(result.is_successful());
        assert_eq!(result.status, RebillStatus::Stopped);
        let recorded = transport.recorded();
        assert_eq!(recorded.len(), 2);
        assert!(recorded[0].1.contains("TRANS_TYPE=GET"));
        assert!(recorded[1].1.contains("TRANS_TYPE=SET"));
        assert!(recorded[1].1.contains("STATUS=STOPPED"));
        assert!(recorded[1].1.contains("REBILL_ID=200456"));
    }

    #[tokio::test]
    async fn rebill_lookup_returns_the_template_authorization() {
        let transport = MockTransport::new(vec![ok_body(
            b"STATUS=active&REBILL_ID=200456&TEMPLATE_ID=9001",
        )]);
        let authorization_id = client(transport)
            .authorization_id_by_rebill_id("200456")
            .await
            .expect("call succeeds");

        assert_eq!(authorization_id.as_deref(), Some("9001"));
    }

    #[tokio::test]
    async fn gateway_error_body_is_surfaced_as_a_failed_result() {
        let transport = MockTransport::new(vec![error_body(
            400,
            b"STATUS=E&MESSAGE=Missing+required+field",
        )]);
        let result = client(transport)
            .authorize(&payment_data(CaptureMethod::Automatic))
            .await
            .expect("call still yields a result");

        assert!(!result.is_successful());
        assert_eq!(result.outcome, TransactionOutcome::Error);
        assert_eq!(result.message, "Missing required field");
        assert_eq!(result.status_code, 400);
    }

    #[tokio::test]
    async fn empty_error_body_gets_a_transport_diagnostic() {
        let transport = MockTransport::new(vec![error_body(502, b"")]);
        let result = client(transport)
            .authorize(&payment_data(CaptureMethod::Automatic))
            .await
            .expect("call still yields a result");

        assert!(!result.is_successful());
        assert_eq!(result.message, "HTTP error status 502");
    }

    #[tokio::test]
    async fn transport_failure_without_a_body_propagates() {
        let transport = MockTransport::new(vec![Err(report!(ApiClientError::RequestNotSent(
            "connection refused".to_string(),
        )))]);
        let result = client(transport)
            .authorize(&payment_data(CaptureMethod::Automatic))
            .await;

        assert!(result.is_err());
    }
}
