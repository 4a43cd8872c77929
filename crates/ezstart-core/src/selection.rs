//! 選択ステートマシン
//!
//! ユーザーの段階的な選択（サブスクリプション → リソースグループ →
//! リソース種別 → リソース名）を保持する純粋な reducer です。
//! [`Selection::apply`] はイベントを受け取り、上流の変更で古くなった
//! 下流のフィールドとリストを同期的に破棄してから、実行すべき [`Effect`] を返します。
//!
//! 各取得要求には [`RequestId`] が振られ、最新の要求以外への応答は破棄されます。

use crate::model::{
    IdentifiedName, ResourceKind, get_subscription_id_by_name, get_subscription_names,
    resource_type_for_label,
};
use crate::submit::{SubmitRequest, SubmitTask, Submission, TaskStatus};

/// Start 後に表示するバナー
pub const SUBMITTED_BANNER: &str = "Operation submitted successfully";

/// 取得要求の識別子
pub type RequestId = u64;

/// 現在のフェーズ（フィールドの埋まり具合から導出）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Empty,
    SubscriptionsLoading,
    SubscriptionsLoaded,
    SubscriptionChosen,
    ResourceGroupsLoading,
    ResourceGroupsLoaded,
    ResourceGroupAndTypeChosen,
    ResourceNamesLoading,
    ResourceNamesLoaded,
    ReadyToSubmit,
    Submitted,
}

/// reducer への入力
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// フォームの表示開始
    Mounted,
    SubscriptionsLoaded {
        request: RequestId,
        subscriptions: Vec<IdentifiedName>,
    },
    SubscriptionSelected(String),
    ResourceGroupsLoaded {
        request: RequestId,
        resource_groups: Vec<String>,
    },
    ResourceGroupSelected(String),
    /// ラベル (例: "Web App") で指定
    ResourceTypeSelected(String),
    ResourceNamesLoaded {
        request: RequestId,
        resource_names: Vec<String>,
    },
    ResourceNameSelected(String),
    StartRequested,
    SubmitTaskFinished {
        submission: u64,
        task: SubmitTask,
        status: TaskStatus,
    },
}

/// reducer が要求する副作用
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    ListSubscriptions {
        request: RequestId,
    },
    ListResourceGroups {
        request: RequestId,
        subscription_id: String,
    },
    /// リソースを一覧し、`resource_type` に一致する名前だけを返す
    ListResourceNames {
        request: RequestId,
        subscription_id: String,
        resource_group: String,
        resource_type: String,
    },
    /// シークレット設定と workflow dispatch を独立に実行する
    Submit {
        submission: u64,
        request: SubmitRequest,
    },
}

/// 実行中の取得要求
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Pending {
    subscriptions: Option<RequestId>,
    resource_groups: Option<RequestId>,
    resource_names: Option<RequestId>,
}

/// 選択状態
///
/// リストは `None` = 未取得、`Some` = 取得済み（空の場合あり）。
#[derive(Debug, Clone, Default)]
pub struct Selection {
    subscriptions: Option<Vec<IdentifiedName>>,
    resource_groups: Option<Vec<String>>,
    resource_names: Option<Vec<String>>,

    subscription_name: Option<String>,
    subscription_id: Option<String>,
    resource_group: Option<String>,
    resource_type_label: Option<String>,
    resource_type: Option<String>,
    resource_name: Option<String>,

    pending: Pending,
    next_request: RequestId,

    banner: Option<String>,
    submission: Option<Submission>,
    next_submission: u64,
}

/// 空文字列は「未選択」
fn non_empty(value: String) -> Option<String> {
    if value.is_empty() { None } else { Some(value) }
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// イベントを適用し、実行すべき副作用を返す
    pub fn apply(&mut self, event: Event) -> Vec<Effect> {
        match event {
            Event::Mounted => {
                let request = self.issue_request();
                self.pending.subscriptions = Some(request);
                vec![Effect::ListSubscriptions { request }]
            }
            Event::SubscriptionsLoaded {
                request,
                subscriptions,
            } => {
                if self.pending.subscriptions != Some(request) {
                    tracing::debug!("Dropping stale subscription list (request {})", request);
                    return Vec::new();
                }
                self.pending.subscriptions = None;
                self.subscriptions = Some(subscriptions);

                // 取得前に名前が選ばれていた場合はここで解決する
                match self.subscription_name.clone() {
                    Some(name) if self.subscription_id.is_none() => self.select_subscription(name),
                    _ => Vec::new(),
                }
            }
            Event::SubscriptionSelected(name) => self.select_subscription(name),
            Event::ResourceGroupsLoaded {
                request,
                resource_groups,
            } => {
                if self.pending.resource_groups != Some(request) {
                    tracing::debug!("Dropping stale resource group list (request {})", request);
                    return Vec::new();
                }
                self.pending.resource_groups = None;
                self.resource_groups = Some(resource_groups);
                Vec::new()
            }
            Event::ResourceGroupSelected(name) => {
                self.resource_group = non_empty(name);
                self.clear_resource_names();
                self.fetch_resource_names()
            }
            Event::ResourceTypeSelected(label) => {
                let provider_type = resource_type_for_label(&label);
                self.resource_type_label = non_empty(label);
                self.resource_type = non_empty(provider_type.to_string());
                self.clear_resource_names();
                self.fetch_resource_names()
            }
            Event::ResourceNamesLoaded {
                request,
                resource_names,
            } => {
                if self.pending.resource_names != Some(request) {
                    tracing::debug!("Dropping stale resource name list (request {})", request);
                    return Vec::new();
                }
                self.pending.resource_names = None;
                self.resource_names = Some(resource_names);
                Vec::new()
            }
            Event::ResourceNameSelected(name) => {
                self.resource_name = non_empty(name);
                Vec::new()
            }
            Event::StartRequested => self.start(),
            Event::SubmitTaskFinished {
                submission,
                task,
                status,
            } => {
                match self.submission.as_mut() {
                    Some(current) if current.id == submission => {
                        tracing::info!("Submit task {} finished: {}", task, status);
                        current.set_status(task, status);
                    }
                    _ => {
                        tracing::debug!("Ignoring result of superseded submission {}", submission);
                    }
                }
                Vec::new()
            }
        }
    }

    fn issue_request(&mut self) -> RequestId {
        self.next_request += 1;
        self.next_request
    }

    fn select_subscription(&mut self, name: String) -> Vec<Effect> {
        self.subscription_name = non_empty(name);
        self.subscription_id = None;
        self.resource_group = None;
        self.resource_groups = None;
        self.pending.resource_groups = None;
        self.resource_name = None;
        self.clear_resource_names();

        let (Some(name), Some(subscriptions)) = (&self.subscription_name, &self.subscriptions)
        else {
            return Vec::new();
        };

        let Some(subscription_id) =
            get_subscription_id_by_name(subscriptions, name).and_then(non_empty)
        else {
            tracing::debug!("Subscription '{}' could not be resolved to an id", name);
            return Vec::new();
        };

        self.subscription_id = Some(subscription_id.clone());
        let request = self.issue_request();
        self.pending.resource_groups = Some(request);
        vec![Effect::ListResourceGroups {
            request,
            subscription_id,
        }]
    }

    fn clear_resource_names(&mut self) {
        self.resource_name = None;
        self.resource_names = None;
        self.pending.resource_names = None;
    }

    /// サブスクリプション ID・リソースグループ・種別が揃ったときだけ取得する
    fn fetch_resource_names(&mut self) -> Vec<Effect> {
        let (Some(subscription_id), Some(resource_group), Some(resource_type)) = (
            self.subscription_id.clone(),
            self.resource_group.clone(),
            self.resource_type.clone(),
        ) else {
            return Vec::new();
        };

        let request = self.issue_request();
        self.pending.resource_names = Some(request);
        vec![Effect::ListResourceNames {
            request,
            subscription_id,
            resource_group,
            resource_type,
        }]
    }

    /// バナーは選択の有無に関わらず表示する。送信は 4 項目が揃ったときだけ
    fn start(&mut self) -> Vec<Effect> {
        self.banner = Some(SUBMITTED_BANNER.to_string());
        let Some(request) = self.submit_request() else {
            tracing::debug!("Start requested with an incomplete selection; nothing sent");
            return Vec::new();
        };

        self.next_submission += 1;
        let submission = self.next_submission;
        self.submission = Some(Submission::new(submission, request.clone()));
        vec![Effect::Submit {
            submission,
            request,
        }]
    }

    /// 4 つの選択値が揃っていれば送信内容を返す
    pub fn submit_request(&self) -> Option<SubmitRequest> {
        Some(SubmitRequest {
            subscription_id: self.subscription_id.clone()?,
            resource_group: self.resource_group.clone()?,
            resource_type: self.resource_type.clone()?,
            resource_name: self.resource_name.clone()?,
        })
    }

    pub fn phase(&self) -> Phase {
        let submitted = match (&self.submission, self.submit_request()) {
            (Some(submission), Some(request)) => submission.request == request,
            _ => false,
        };

        if submitted {
            Phase::Submitted
        } else if self.pending.resource_names.is_some() {
            Phase::ResourceNamesLoading
        } else if self.submit_request().is_some() {
            Phase::ReadyToSubmit
        } else if self.resource_names.is_some() {
            Phase::ResourceNamesLoaded
        } else if self.pending.resource_groups.is_some() {
            Phase::ResourceGroupsLoading
        } else if self.subscription_id.is_some()
            && self.resource_group.is_some()
            && self.resource_type.is_some()
        {
            Phase::ResourceGroupAndTypeChosen
        } else if self.resource_groups.is_some() {
            Phase::ResourceGroupsLoaded
        } else if self.subscription_name.is_some() {
            Phase::SubscriptionChosen
        } else if self.pending.subscriptions.is_some() {
            Phase::SubscriptionsLoading
        } else if self.subscriptions.is_some() {
            Phase::SubscriptionsLoaded
        } else {
            Phase::Empty
        }
    }

    /// 取得中のリストまたは未完了の送信タスクがあるか
    pub fn is_busy(&self) -> bool {
        self.pending != Pending::default()
            || self
                .submission
                .as_ref()
                .is_some_and(|submission| !submission.is_finished())
    }

    pub fn is_loading_subscriptions(&self) -> bool {
        self.pending.subscriptions.is_some()
    }

    pub fn is_loading_resource_groups(&self) -> bool {
        self.pending.resource_groups.is_some()
    }

    pub fn is_loading_resource_names(&self) -> bool {
        self.pending.resource_names.is_some()
    }

    // ── Derived option lists ─────────────────────────────────────────

    pub fn subscription_options(&self) -> Vec<String> {
        self.subscriptions
            .as_deref()
            .map(get_subscription_names)
            .unwrap_or_default()
    }

    /// サブスクリプション ID が解決済みのときだけ意味を持つ
    pub fn resource_group_options(&self) -> Vec<String> {
        if self.subscription_id.is_none() {
            return Vec::new();
        }
        self.resource_groups.clone().unwrap_or_default()
    }

    pub fn resource_type_options(&self) -> Vec<String> {
        ResourceKind::labels().into_iter().map(String::from).collect()
    }

    /// サブスクリプション ID・リソースグループ・種別が揃ったときだけ意味を持つ
    pub fn resource_name_options(&self) -> Vec<String> {
        if self.subscription_id.is_none()
            || self.resource_group.is_none()
            || self.resource_type.is_none()
        {
            return Vec::new();
        }
        self.resource_names.clone().unwrap_or_default()
    }

    // ── Accessors ────────────────────────────────────────────────────

    pub fn subscriptions(&self) -> &[IdentifiedName] {
        self.subscriptions.as_deref().unwrap_or_default()
    }

    pub fn subscription_name(&self) -> Option<&str> {
        self.subscription_name.as_deref()
    }

    pub fn subscription_id(&self) -> Option<&str> {
        self.subscription_id.as_deref()
    }

    pub fn resource_group(&self) -> Option<&str> {
        self.resource_group.as_deref()
    }

    pub fn resource_type_label(&self) -> Option<&str> {
        self.resource_type_label.as_deref()
    }

    /// プロバイダー種別文字列 (例: "Microsoft.Web/sites")
    pub fn resource_type(&self) -> Option<&str> {
        self.resource_type.as_deref()
    }

    pub fn resource_name(&self) -> Option<&str> {
        self.resource_name.as_deref()
    }

    pub fn banner(&self) -> Option<&str> {
        self.banner.as_deref()
    }

    pub fn submission(&self) -> Option<&Submission> {
        self.submission.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn subs() -> Vec<IdentifiedName> {
        vec![
            IdentifiedName::new("1", "Sub1"),
            IdentifiedName::new("2", "Sub2"),
        ]
    }

    /// マウントしてサブスクリプション一覧を読み込んだ状態を作る
    fn loaded() -> Selection {
        let mut selection = Selection::new();
        let effects = selection.apply(Event::Mounted);
        let Effect::ListSubscriptions { request } = effects[0] else {
            panic!("Expected ListSubscriptions, got {:?}", effects);
        };
        selection.apply(Event::SubscriptionsLoaded {
            request,
            subscriptions: subs(),
        });
        selection
    }

    fn group_request(effects: &[Effect]) -> RequestId {
        match effects {
            [Effect::ListResourceGroups { request, .. }] => *request,
            other => panic!("Expected ListResourceGroups, got {:?}", other),
        }
    }

    fn names_request(effects: &[Effect]) -> RequestId {
        match effects {
            [Effect::ListResourceNames { request, .. }] => *request,
            other => panic!("Expected ListResourceNames, got {:?}", other),
        }
    }

    /// 4 つすべてを選択した状態を作る
    fn ready() -> Selection {
        let mut selection = loaded();
        let request = group_request(&selection.apply(Event::SubscriptionSelected("Sub1".into())));
        selection.apply(Event::ResourceGroupsLoaded {
            request,
            resource_groups: vec!["rg-a".into()],
        });
        selection.apply(Event::ResourceGroupSelected("rg-a".into()));
        let request = names_request(&selection.apply(Event::ResourceTypeSelected("Web App".into())));
        selection.apply(Event::ResourceNamesLoaded {
            request,
            resource_names: vec!["web-1".into()],
        });
        selection.apply(Event::ResourceNameSelected("web-1".into()));
        selection
    }

    #[test]
    fn test_mount_requests_subscriptions() {
        let mut selection = Selection::new();
        assert_eq!(selection.phase(), Phase::Empty);

        let effects = selection.apply(Event::Mounted);
        assert!(matches!(effects.as_slice(), [Effect::ListSubscriptions { .. }]));
        assert_eq!(selection.phase(), Phase::SubscriptionsLoading);
        assert!(selection.is_busy());
    }

    #[test]
    fn test_subscriptions_loaded() {
        let selection = loaded();
        assert_eq!(selection.phase(), Phase::SubscriptionsLoaded);
        assert_eq!(selection.subscription_options(), vec!["Sub1", "Sub2"]);
        assert!(!selection.is_busy());
    }

    #[test]
    fn test_failed_subscription_load_is_interactive() {
        let mut selection = Selection::new();
        let effects = selection.apply(Event::Mounted);
        let Effect::ListSubscriptions { request } = effects[0] else {
            panic!("Expected ListSubscriptions");
        };
        selection.apply(Event::SubscriptionsLoaded {
            request,
            subscriptions: Vec::new(),
        });

        assert_eq!(selection.phase(), Phase::SubscriptionsLoaded);
        assert!(selection.subscription_options().is_empty());
    }

    #[test]
    fn test_select_subscription_resolves_id_and_fetches_groups() {
        let mut selection = loaded();
        let effects = selection.apply(Event::SubscriptionSelected("Sub1".into()));

        assert_eq!(selection.subscription_id(), Some("1"));
        assert!(matches!(
            effects.as_slice(),
            [Effect::ListResourceGroups { subscription_id, .. }] if subscription_id == "1"
        ));
        assert_eq!(selection.phase(), Phase::ResourceGroupsLoading);
    }

    #[test]
    fn test_unknown_subscription_does_not_fetch() {
        let mut selection = loaded();
        let effects = selection.apply(Event::SubscriptionSelected("sub1".into()));

        assert!(effects.is_empty());
        assert_eq!(selection.subscription_id(), None);
        assert_eq!(selection.phase(), Phase::SubscriptionChosen);
        assert!(selection.resource_group_options().is_empty());
    }

    #[test]
    fn test_subscription_selected_before_load_resolves_on_load() {
        let mut selection = Selection::new();
        let effects = selection.apply(Event::Mounted);
        let Effect::ListSubscriptions { request } = effects[0] else {
            panic!("Expected ListSubscriptions");
        };

        assert!(selection.apply(Event::SubscriptionSelected("Sub2".into())).is_empty());

        let effects = selection.apply(Event::SubscriptionsLoaded {
            request,
            subscriptions: subs(),
        });
        assert!(matches!(
            effects.as_slice(),
            [Effect::ListResourceGroups { subscription_id, .. }] if subscription_id == "2"
        ));
    }

    #[test]
    fn test_names_fetch_requires_group_and_type() {
        let mut selection = loaded();
        let request = group_request(&selection.apply(Event::SubscriptionSelected("Sub1".into())));
        selection.apply(Event::ResourceGroupsLoaded {
            request,
            resource_groups: vec!["rg-a".into(), "rg-b".into()],
        });
        assert_eq!(selection.phase(), Phase::ResourceGroupsLoaded);
        assert_eq!(selection.resource_group_options(), vec!["rg-a", "rg-b"]);

        // グループだけでは取得しない
        assert!(selection.apply(Event::ResourceGroupSelected("rg-a".into())).is_empty());

        let effects = selection.apply(Event::ResourceTypeSelected("Kubernetes Service".into()));
        assert_eq!(
            effects,
            vec![Effect::ListResourceNames {
                request: names_request(&effects),
                subscription_id: "1".into(),
                resource_group: "rg-a".into(),
                resource_type: "Microsoft.Kubernetes/clusters".into(),
            }]
        );
        assert_eq!(selection.phase(), Phase::ResourceNamesLoading);
    }

    #[test]
    fn test_type_before_group_fetches_on_group() {
        let mut selection = loaded();
        let request = group_request(&selection.apply(Event::SubscriptionSelected("Sub1".into())));
        selection.apply(Event::ResourceGroupsLoaded {
            request,
            resource_groups: vec!["rg-a".into()],
        });

        assert!(selection.apply(Event::ResourceTypeSelected("Web App".into())).is_empty());
        let effects = selection.apply(Event::ResourceGroupSelected("rg-a".into()));
        assert_eq!(effects.len(), 1);
    }

    #[test]
    fn test_unrecognized_type_does_not_fetch() {
        let mut selection = loaded();
        let request = group_request(&selection.apply(Event::SubscriptionSelected("Sub1".into())));
        selection.apply(Event::ResourceGroupsLoaded {
            request,
            resource_groups: vec!["rg-a".into()],
        });
        selection.apply(Event::ResourceGroupSelected("rg-a".into()));

        let effects = selection.apply(Event::ResourceTypeSelected("Function App".into()));
        assert!(effects.is_empty());
        assert_eq!(selection.resource_type(), None);
        assert_eq!(selection.resource_type_label(), Some("Function App"));
        assert!(selection.resource_name_options().is_empty());
    }

    #[test]
    fn test_ready_to_submit() {
        let selection = ready();
        assert_eq!(selection.phase(), Phase::ReadyToSubmit);
        assert_eq!(selection.resource_name_options(), vec!["web-1"]);
        assert_eq!(
            selection.submit_request(),
            Some(SubmitRequest {
                subscription_id: "1".into(),
                resource_group: "rg-a".into(),
                resource_type: "Microsoft.Web/sites".into(),
                resource_name: "web-1".into(),
            })
        );
    }

    #[test]
    fn test_changing_subscription_clears_downstream() {
        let mut selection = ready();
        let effects = selection.apply(Event::SubscriptionSelected("Sub2".into()));

        group_request(&effects);
        assert_eq!(selection.subscription_id(), Some("2"));
        assert_eq!(selection.resource_group(), None);
        assert_eq!(selection.resource_name(), None);
        assert!(selection.resource_group_options().is_empty());
        assert!(selection.resource_name_options().is_empty());
        // 種別は静的な選択肢なので保持される
        assert_eq!(selection.resource_type(), Some("Microsoft.Web/sites"));
    }

    #[test]
    fn test_changing_group_clears_names() {
        let mut selection = ready();
        let effects = selection.apply(Event::ResourceGroupSelected("rg-b".into()));

        assert_eq!(effects.len(), 1);
        assert_eq!(selection.resource_name(), None);
        assert!(selection.resource_name_options().is_empty());
        assert_eq!(selection.phase(), Phase::ResourceNamesLoading);
    }

    #[test]
    fn test_clearing_subscription() {
        let mut selection = ready();
        let effects = selection.apply(Event::SubscriptionSelected(String::new()));

        assert!(effects.is_empty());
        assert_eq!(selection.subscription_name(), None);
        assert_eq!(selection.subscription_id(), None);
        assert_eq!(selection.phase(), Phase::SubscriptionsLoaded);
    }

    #[test]
    fn test_stale_group_response_is_dropped() {
        let mut selection = loaded();
        let first = group_request(&selection.apply(Event::SubscriptionSelected("Sub1".into())));
        let second = group_request(&selection.apply(Event::SubscriptionSelected("Sub2".into())));
        assert_ne!(first, second);

        // 2 番目の応答が先に届き、その後に古い応答が届く
        selection.apply(Event::ResourceGroupsLoaded {
            request: second,
            resource_groups: vec!["rg-of-sub2".into()],
        });
        selection.apply(Event::ResourceGroupsLoaded {
            request: first,
            resource_groups: vec!["rg-of-sub1".into()],
        });

        assert_eq!(selection.resource_group_options(), vec!["rg-of-sub2"]);
    }

    #[test]
    fn test_stale_names_response_is_dropped() {
        let mut selection = ready();
        let request = names_request(&selection.apply(Event::ResourceTypeSelected(
            "Kubernetes Service".into(),
        )));

        selection.apply(Event::ResourceNamesLoaded {
            request: request - 1,
            resource_names: vec!["old".into()],
        });
        assert!(selection.is_loading_resource_names());
        assert!(selection.resource_name_options().is_empty());

        selection.apply(Event::ResourceNamesLoaded {
            request,
            resource_names: vec!["aks-1".into()],
        });
        assert_eq!(selection.resource_name_options(), vec!["aks-1"]);
    }

    #[test]
    fn test_start_with_all_fields() {
        let mut selection = ready();
        let effects = selection.apply(Event::StartRequested);

        assert!(matches!(effects.as_slice(), [Effect::Submit { .. }]));
        assert_eq!(selection.banner(), Some(SUBMITTED_BANNER));
        assert_eq!(selection.phase(), Phase::Submitted);
        assert!(selection.is_busy());
    }

    #[test]
    fn test_start_incomplete_acknowledges_without_sending() {
        let mut selection = Selection::new();
        let effects = selection.apply(Event::StartRequested);

        assert!(effects.is_empty());
        assert_eq!(selection.banner(), Some(SUBMITTED_BANNER));
        assert!(selection.submission().is_none());

        // 途中まで選んだ状態でも同じ
        let mut selection = loaded();
        selection.apply(Event::SubscriptionSelected("Sub1".into()));
        assert!(selection.apply(Event::StartRequested).is_empty());
        assert_eq!(selection.banner(), Some(SUBMITTED_BANNER));
        assert!(selection.submission().is_none());
    }

    #[test]
    fn test_submit_task_status_is_observable() {
        let mut selection = ready();
        let effects = selection.apply(Event::StartRequested);
        let Effect::Submit { submission, .. } = effects[0].clone() else {
            panic!("Expected Submit");
        };

        selection.apply(Event::SubmitTaskFinished {
            submission,
            task: SubmitTask::Secret,
            status: TaskStatus::Failed("404".into()),
        });
        selection.apply(Event::SubmitTaskFinished {
            submission,
            task: SubmitTask::Workflow,
            status: TaskStatus::Succeeded,
        });

        let current = selection.submission().unwrap();
        assert_eq!(current.secret, TaskStatus::Failed("404".into()));
        assert_eq!(current.workflow, TaskStatus::Succeeded);
        assert!(!selection.is_busy());
        // バナーは結果に関わらず変わらない
        assert_eq!(selection.banner(), Some(SUBMITTED_BANNER));
    }

    #[test]
    fn test_superseded_submission_result_ignored() {
        let mut selection = ready();
        selection.apply(Event::StartRequested);
        selection.apply(Event::StartRequested);

        selection.apply(Event::SubmitTaskFinished {
            submission: 1,
            task: SubmitTask::Secret,
            status: TaskStatus::Succeeded,
        });

        let current = selection.submission().unwrap();
        assert_eq!(current.id, 2);
        assert_eq!(current.secret, TaskStatus::Pending);
    }
}
