//! Slide-panel markup for the payment settings editor
//!
//! The panel is loaded into the admin dashboard's side drawer. The drawer's
//! script posts `#sidePanel_form` under its `data-ajax-action`.

use crate::payments::types::FieldKind;
use crate::services::settings_form::{RenderedField, SettingsForm};
use crate::services::settings_submission::PAYMENT_EDIT_ACTION;
use maud::{html, Markup};

/// Settings editor for one payment method
pub fn settings_panel(form: &SettingsForm) -> Markup {
    html! {
        (panel_header(&form.heading, true))
        div class="slidePanel-inner" {
            div class="panel-body" {
                div class="row" {
                    div class="col-sm-12" {
                        div class="white-box" {
                            div id="post_error" {}
                            form name="form2" class="form form-horizontal" method="post"
                                data-ajax-action=(PAYMENT_EDIT_ACTION) id="sidePanel_form" {
                                div class="form-body" {
                                    input type="hidden" name="id" value=(form.method_id);

                                    div class="form-group" {
                                        label class="col-sm-4 control-label" { "Title:" }
                                        div class="col-sm-6" {
                                            input name="title" type="text" class="form-control" value=(form.title);
                                        }
                                    }

                                    div class="form-group" {
                                        label class="col-sm-4 control-label" { "Turn On/Off" }
                                        div class="col-sm-6" {
                                            select name="install" id="install" class="form-control" {
                                                @for choice in &form.install_choices {
                                                    option value=(choice.value) selected[choice.selected] { (choice.label) }
                                                }
                                            }
                                        }
                                    }

                                    @for field in &form.fields {
                                        (field_group(field))
                                    }

                                    @if let Some(url) = &form.webhook_url {
                                        div class="form-group" {
                                            label class="col-sm-4 control-label" { (form.webhook_label.unwrap_or("WebHook Url:")) }
                                            div class="col-sm-6" {
                                                input type="text" class="form-control" value=(url) readonly;
                                            }
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

fn field_group(field: &RenderedField) -> Markup {
    html! {
        div class="form-group" {
            label class="col-sm-4 control-label" { (field.label) }
            div class="col-sm-6" {
                @match field.kind {
                    FieldKind::Select => {
                        select name=(field.name) class="form-control" {
                            @for choice in &field.choices {
                                option value=(choice.value) selected[choice.selected] { (choice.label) }
                            }
                        }
                    }
                    FieldKind::Textarea => {
                        textarea name=(field.name) class="form-control" rows=[field.rows]
                            placeholder=[field.placeholder] { (field.value) }
                    }
                    FieldKind::Text => {
                        input name=(field.name) type="text" class="form-control"
                            placeholder=[field.placeholder] value=(field.value);
                    }
                }
                @if let Some(help) = field.help {
                    code class="help-block" { (help) }
                }
            }
        }
    }
}

/// Panel shown instead of the editor when the id cannot be served
pub fn message_panel(heading: &str, message: &str) -> Markup {
    html! {
        (panel_header(heading, false))
        div class="slidePanel-inner" {
            div class="panel-body" {
                div class="white-box" {
                    div class="alert alert-danger" role="alert" { (message) }
                }
            }
        }
    }
}

fn panel_header(heading: &str, with_save: bool) -> Markup {
    html! {
        header class="slidePanel-header overlay" {
            div class="overlay-panel overlay-background vertical-align" {
                div class="service-heading" {
                    h2 { (heading) }
                }
                div class="slidePanel-actions" {
                    div class="btn-group-flat" {
                        @if with_save {
                            button type="button" class="btn btn-floating btn-warning btn-sm margin-right-10"
                                id="post_sidePanel_data" {
                                i class="icon ion-android-done" aria-hidden="true" {}
                            }
                        }
                        button type="button" class="btn btn-pure btn-inverse slidePanel-close icon ion-android-close font-size-20"
                            aria-hidden="true" {}
                    }
                }
            }
        }
    }
}
