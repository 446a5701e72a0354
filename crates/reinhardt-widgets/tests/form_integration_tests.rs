//! Integration tests for the form controller
//!
//! These tests verify the form flow end to end:
//! 1. Props-borne and caller-supplied validation rules
//! 2. DOM-triggered submission through the submit hook
//! 3. Re-entrancy and state restoration
//! 4. Native reset handling
//! 5. Default JSON submission against a local HTTP endpoint

mod utils;

mod form_tests {
	use std::cell::{Cell, RefCell};
	use std::net::SocketAddr;
	use std::rc::Rc;

	use axum::http::StatusCode;
	use axum::routing::{post, put};
	use axum::{Json, Router};
	use futures::channel::oneshot;
	use futures::poll;
	use reinhardt_widgets::{
		Document, Event, FieldValue, FieldValues, FormController, FormOptions, HydrationSettings,
		Hydrator, ValidationRule,
	};
	use rstest::rstest;
	use serde_json::{Value, json};
	use tokio::task::LocalSet;

	use crate::utils::fixtures::{EventLog, element, load_document, settle};

	fn hydrate(document: &Document, options: FormOptions) -> Rc<FormController> {
		hydrate_with(document, options, HydrationSettings::default())
	}

	fn hydrate_with(
		document: &Document,
		options: FormOptions,
		settings: HydrationSettings,
	) -> Rc<FormController> {
		let mut hydrator = Hydrator::with_settings(document.clone(), settings);
		hydrator.configure("signup", options);
		hydrator.hydrate("signup");
		hydrator.form("signup").cloned().unwrap()
	}

	fn text(value: &str) -> FieldValue {
		FieldValue::from(value)
	}

	fn type_into(document: &Document, name: &str, value: &str) {
		let input = element(document, &format!("[name={}]", name));
		input.set_value(value);
		input.dispatch_event(&Event::bubbling("input"));
	}

	/// Starts a JSON echo server and returns its address.
	async fn serve() -> SocketAddr {
		let app = Router::new()
			.route(
				"/signup",
				post(|Json(body): Json<Value>| async move {
					Json(json!({ "id": 7, "received": body }))
				}),
			)
			.route("/reject", post(|| async { StatusCode::UNPROCESSABLE_ENTITY }))
			.route(
				"/profile",
				put(|Json(body): Json<Value>| async move {
					Json(json!({ "method": "PUT", "received": body }))
				}),
			)
			.route("/plain", post(|| async { "ok" }));
		let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
		let addr = listener.local_addr().unwrap();
		tokio::spawn(async move {
			axum::serve(listener, app).await.unwrap();
		});
		addr
	}

	#[rstest]
	fn test_props_rules_then_native_constraints() {
		let document = load_document("signup_form.html");
		let form = hydrate(&document, FormOptions::new());

		assert!(!form.validate_all());
		assert_eq!(form.errors()["username"], "Username is required");
		assert_eq!(form.errors()["email"], "");

		type_into(&document, "username", "ad");
		assert_eq!(form.errors()["username"], "At least 3 characters");
		type_into(&document, "username", "ada");
		assert_eq!(form.errors()["username"], "");

		type_into(&document, "email", "not-an-email");
		assert_eq!(form.errors()["email"], "Please enter an email address.");
		let email = element(&document, "[name=email]");
		assert!(email.has_class("ui-form__input--error"));

		type_into(&document, "email", "ada@example.com");
		assert!(form.validate_all());
		assert!(form.is_valid());
	}

	#[rstest]
	fn test_option_rules_replace_props_rules() {
		let document = load_document("signup_form.html");
		let form = hydrate(
			&document,
			FormOptions::new().rules("username", vec![ValidationRule::max_length(5, "Too long")]),
		);
		assert!(form.validate_field("username"));
		type_into(&document, "username", "abcdefg");
		assert_eq!(form.errors()["username"], "Too long");
	}

	#[rstest]
	fn test_field_change_hook_and_event() {
		let document = load_document("signup_form.html");
		let changes = Rc::new(RefCell::new(Vec::new()));
		let sink = Rc::clone(&changes);
		let form = hydrate(
			&document,
			FormOptions::new().on_field_change(move |(name, value): (String, FieldValue)| {
				sink.borrow_mut().push((name, value));
			}),
		);
		let events = EventLog::listen(&document.body(), "form:fieldChange");

		let pro = element(&document, "[name=plan][value=pro]");
		pro.set_checked(true);
		pro.dispatch_event(&Event::bubbling("change"));

		assert_eq!(form.values()["plan"], text("pro"));
		assert_eq!(*changes.borrow(), vec![("plan".to_string(), text("pro"))]);
		assert_eq!(events.details(), vec![json!({ "name": "plan", "value": "pro" })]);
	}

	#[rstest]
	#[tokio::test]
	async fn test_dom_submit_runs_hook() {
		let document = load_document("signup_form.html");
		let submitted: Rc<RefCell<Option<FieldValues>>> = Rc::new(RefCell::new(None));
		let sink = Rc::clone(&submitted);
		let form = hydrate(
			&document,
			FormOptions::new().on_submit(move |values: FieldValues| {
				*sink.borrow_mut() = Some(values);
				async { Ok::<_, std::io::Error>(()) }
			}),
		);
		let submits = EventLog::listen(&document.body(), "form:submit");

		LocalSet::new()
			.run_until(async {
				type_into(&document, "username", "ada");
				let root = element(&document, "#signup");
				assert!(!root.request_submit());
				settle().await;
			})
			.await;

		let values = submitted.borrow().clone().unwrap();
		assert_eq!(values["username"], text("ada"));
		assert_eq!(values["newsletter"], FieldValue::Bool(true));
		assert_eq!(values["plan"], text("free"));
		assert_eq!(submits.len(), 1);
		assert_eq!(submits.details()[0]["values"]["age"], "21");
		assert!(!form.is_submitting());
	}

	#[rstest]
	#[tokio::test]
	async fn test_validation_error_hook_and_event() {
		let document = load_document("signup_form.html");
		let reported = Rc::new(RefCell::new(None));
		let sink = Rc::clone(&reported);
		let form = hydrate(
			&document,
			FormOptions::new().on_validation_error(move |errors| {
				*sink.borrow_mut() = Some(errors);
			}),
		);
		let events = EventLog::listen(&document.body(), "form:validationError");

		form.submit().await;

		let errors = reported.borrow().clone().unwrap();
		assert_eq!(errors["username"], "Username is required");
		assert_eq!(events.details()[0]["errors"]["username"], "Username is required");
		assert!(!form.is_submitting());
	}

	#[rstest]
	#[tokio::test]
	async fn test_reentrant_submit_is_dropped() {
		let document = load_document("signup_form.html");
		let (release, gate) = oneshot::channel::<()>();
		let gate = Rc::new(RefCell::new(Some(gate)));
		let calls = Rc::new(Cell::new(0));
		let counter = Rc::clone(&calls);
		let form = hydrate(
			&document,
			FormOptions::new().on_submit(move |_values| {
				counter.set(counter.get() + 1);
				let gate = gate.borrow_mut().take();
				async move {
					if let Some(gate) = gate {
						let _ = gate.await;
					}
					Ok::<_, std::io::Error>(())
				}
			}),
		);
		form.set_values([("username".to_string(), text("ada"))]);
		let button = element(&document, ".ui-form__submit");

		let mut first = Box::pin(form.submit());
		assert!(poll!(&mut first).is_pending());
		assert!(form.is_submitting());
		assert!(button.disabled());
		assert_eq!(button.text_content(), "Submitting...");

		form.submit().await;
		assert_eq!(calls.get(), 1);

		release.send(()).unwrap();
		first.await;
		assert_eq!(calls.get(), 1);
		assert!(!form.is_submitting());
		assert!(!button.disabled());
		assert_eq!(button.text_content(), "Sign up");
		assert!(!button.has_attribute("data-original-text"));
	}

	#[rstest]
	#[tokio::test]
	async fn test_native_reset_restores_defaults() {
		let document = load_document("signup_form.html");
		let form = hydrate(&document, FormOptions::new());
		let resets = EventLog::listen(&document.body(), "form:reset");

		LocalSet::new()
			.run_until(async {
				type_into(&document, "username", "x");
				element(&document, "[name=username]").blur();
				assert_eq!(form.errors()["username"], "At least 3 characters");

				element(&document, "#signup").reset();
				settle().await;
			})
			.await;

		assert_eq!(resets.len(), 1);
		assert_eq!(form.values()["username"], text(""));
		assert!(form.errors().is_empty());
		assert!(form.state().touched.is_empty());
		let slot = element(&document, "[data-error=username]");
		assert_eq!(slot.text_content(), "");
		assert!(
			document
				.query_selector_all(".ui-form__input--error")
				.unwrap()
				.is_empty()
		);
	}

	#[rstest]
	#[tokio::test]
	async fn test_http_submit_success() {
		let addr = serve().await;
		let document = load_document("signup_form.html");
		let form = hydrate(
			&document,
			FormOptions::new().submit_url(format!("http://{}/signup", addr)),
		);
		let successes = EventLog::listen(&document.body(), "form:submitSuccess");
		let submits = EventLog::listen(&document.body(), "form:submit");
		form.set_values([("username".to_string(), text("ada"))]);

		form.submit().await;

		let result = &successes.details()[0]["result"];
		assert_eq!(result["id"], 7);
		assert_eq!(result["received"]["username"], "ada");
		assert_eq!(result["received"]["newsletter"], true);
		assert_eq!(submits.len(), 1);
		assert!(!form.is_submitting());
	}

	#[rstest]
	#[tokio::test]
	async fn test_http_submit_rejected() {
		let addr = serve().await;
		let document = load_document("signup_form.html");
		let form = hydrate(
			&document,
			FormOptions::new().submit_url(format!("http://{}/reject", addr)),
		);
		let errors = EventLog::listen(&document.body(), "form:submitError");
		let submits = EventLog::listen(&document.body(), "form:submit");
		form.set_values([("username".to_string(), text("ada"))]);

		form.submit().await;

		assert_eq!(errors.details(), vec![json!({ "error": "Submit failed: 422" })]);
		assert_eq!(submits.len(), 0);
		assert!(!element(&document, ".ui-form__submit").disabled());
	}

	#[rstest]
	#[tokio::test]
	async fn test_http_submit_non_json_body() {
		let addr = serve().await;
		let document = load_document("signup_form.html");
		let form = hydrate(
			&document,
			FormOptions::new().submit_url(format!("http://{}/plain", addr)),
		);
		let errors = EventLog::listen(&document.body(), "form:submitError");
		form.set_values([("username".to_string(), text("ada"))]);

		form.submit().await;

		let message = errors.details()[0]["error"].as_str().unwrap().to_string();
		assert!(message.starts_with("submit response is not JSON"), "{}", message);
	}

	#[rstest]
	#[tokio::test]
	async fn test_http_submit_uses_action_method_and_base_url() {
		let addr = serve().await;
		let document = load_document("signup_form.html");
		let root = element(&document, "#signup");
		root.set_attribute("action", "/profile");
		root.set_attribute("method", "put");
		let settings = HydrationSettings {
			base_url: Some(format!("http://{}/", addr)),
			..HydrationSettings::default()
		};
		let form = hydrate_with(&document, FormOptions::new(), settings);
		let successes = EventLog::listen(&document.body(), "form:submitSuccess");
		form.set_values([("username".to_string(), text("ada"))]);

		form.submit().await;

		assert_eq!(successes.details()[0]["result"]["method"], "PUT");
	}

	#[rstest]
	#[tokio::test]
	async fn test_no_url_and_no_hook_still_emits_submit() {
		let document = load_document("signup_form.html");
		let form = hydrate(&document, FormOptions::new());
		let submits = EventLog::listen(&document.body(), "form:submit");
		let successes = EventLog::listen(&document.body(), "form:submitSuccess");
		form.set_values([("username".to_string(), text("ada"))]);

		form.submit().await;

		assert_eq!(submits.len(), 1);
		assert_eq!(successes.len(), 0);
	}
}
