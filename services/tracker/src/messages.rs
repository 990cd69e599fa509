//! Localized UI messages
//!
//! Messages are looked up by key. French falls back to English, and a key
//! missing from both resolves to the key itself.

use crate::models::{Priority, Status};

/// Name of the cookie remembering the chosen locale
pub const LOCALE_COOKIE: &str = "user_locale";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Locale {
    #[default]
    En,
    Fr,
}

impl Locale {
    /// Parse a language tag such as `fr` or `fr-CA`
    pub fn from_tag(tag: &str) -> Option<Self> {
        let primary = tag.trim().split(['-', '_']).next().unwrap_or_default();
        if primary.eq_ignore_ascii_case("en") {
            Some(Locale::En)
        } else if primary.eq_ignore_ascii_case("fr") {
            Some(Locale::Fr)
        } else {
            None
        }
    }

    pub fn tag(&self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Fr => "fr",
        }
    }

    /// Resolve `key` in this locale
    pub fn text<'a>(&self, key: &'a str) -> &'a str {
        let found = match self {
            Locale::En => english(key),
            Locale::Fr => french(key).or_else(|| english(key)),
        };
        match found {
            Some(text) => text,
            None => key,
        }
    }

    /// Resolve `key` and substitute `{0}` with `arg`
    pub fn format(&self, key: &str, arg: &str) -> String {
        self.text(key).replace("{0}", arg)
    }

    pub fn priority(&self, priority: Priority) -> &'static str {
        match self {
            Locale::En => priority.display_name(),
            Locale::Fr => match priority {
                Priority::Critical => "Critique",
                Priority::High => "Haute",
                Priority::Medium => "Moyenne",
                Priority::Low => "Basse",
            },
        }
    }

    pub fn status(&self, status: Status) -> &'static str {
        match self {
            Locale::En => status.display_name(),
            Locale::Fr => match status {
                Status::Open => "Ouvert",
                Status::InProgress => "En cours",
                Status::Resolved => "Résolu",
                Status::Closed => "Fermé",
                Status::Reopened => "Rouvert",
            },
        }
    }
}

fn english(key: &str) -> Option<&'static str> {
    let text = match key {
        "app.title" => "Bug Tracker",
        "nav.home" => "Home",
        "nav.about" => "About",
        "nav.bugs" => "Bugs",
        "nav.search" => "Search",
        "nav.users" => "Users",
        "nav.profile" => "Profile",
        "nav.login" => "Log in",
        "nav.logout" => "Log out",
        "nav.register" => "Register",

        "home.welcome" => "Welcome to the Bug Tracker",
        "home.intro" => "Track, assign and resolve bugs with your team.",
        "home.greeting" => "Signed in as {0}.",
        "home.stats" => "{0} bugs tracked.",
        "about.title" => "About",
        "about.body" => "A small multi-user issue tracker. Administrators manage accounts; everyone else reports and works on bugs.",

        "login.title" => "Log in",
        "login.submit" => "Log in",
        "login.error" => "Invalid username or password.",
        "login.logout" => "You have been logged out.",
        "register.title" => "Create an account",
        "register.submit" => "Register",

        "field.id" => "ID",
        "field.username" => "Username",
        "field.password" => "Password",
        "field.first_name" => "First name",
        "field.last_name" => "Last name",
        "field.email" => "Email",
        "field.admin" => "Administrator",
        "field.role" => "Role",
        "field.title" => "Title",
        "field.description" => "Description",
        "field.priority" => "Priority",
        "field.status" => "Status",
        "field.assignees" => "Assigned users",
        "field.created_at" => "Created",
        "field.updated_at" => "Updated",

        "bugs.title" => "Bugs",
        "bugs.new" => "Report a bug",
        "bugs.edit" => "Edit bug",
        "bugs.empty" => "No bugs found.",
        "bugs.unassigned" => "Nobody is assigned.",
        "bugs.assign" => "Assign",
        "bugs.unassign" => "Remove",
        "bugs.delete" => "Delete bug",

        "search.title" => "Search bugs",
        "search.field" => "Field",
        "search.value" => "Value",
        "search.exact" => "Exact match",
        "search.submit" => "Search",
        "search.results" => "{0} matching bugs.",
        "search.value.required" => "Enter a value to search for.",
        "search.value.invalid" => "That value is not valid for the selected field.",
        "search.field.invalid" => "Unknown search field.",

        "users.title" => "Users",
        "users.new" => "New user",
        "users.edit" => "Edit user",
        "users.empty" => "No users found.",
        "users.delete" => "Delete",

        "profile.title" => "My profile",
        "profile.edit" => "Edit profile",
        "profile.assigned" => "Bugs assigned to me",
        "profile.password.hint" => "Leave blank to keep the current password.",

        "action.save" => "Save",
        "action.cancel" => "Cancel",
        "action.edit" => "Edit",
        "page.previous" => "Previous",
        "page.next" => "Next",
        "page.info" => "Page {0}",

        "flash.registered" => "Registration successful. Please log in.",
        "flash.bug.created" => "Bug created successfully.",
        "flash.bug.updated" => "Bug updated successfully.",
        "flash.bug.deleted" => "Bug deleted successfully.",
        "flash.bug.assigned" => "User assigned.",
        "flash.bug.unassigned" => "User removed from the bug.",
        "flash.user.created" => "User created successfully.",
        "flash.user.updated" => "User updated successfully.",
        "flash.user.deleted" => "User deleted successfully.",
        "flash.profile.updated" => "Profile updated successfully.",
        "flash.error" => "{0}",

        "error.forbidden" => "You do not have permission to view this page.",
        "error.sort.invalid" => "Unknown sort order.",

        "validation.username.required" => "Username is required.",
        "validation.username.size" => "Username must be between 3 and 50 characters.",
        "validation.username.taken" => "This username is already taken.",
        "validation.password.required" => "Password is required.",
        "validation.password.size" => "Password must be at least 6 characters.",
        "validation.password.size.profile" => "Password must be at least 8 characters.",
        "validation.name.required" => "This field is required.",
        "validation.name.size" => "Must be at most 50 characters.",
        "validation.email.required" => "Email is required.",
        "validation.email.invalid" => "Please enter a valid email address.",
        "validation.email.taken" => "This email is already registered.",
        "validation.title.required" => "Title is required.",
        "validation.title.size" => "Title must be at most 255 characters.",
        "validation.description.required" => "Description is required.",
        _ => return None,
    };
    Some(text)
}

fn french(key: &str) -> Option<&'static str> {
    let text = match key {
        "app.title" => "Suivi des bogues",
        "nav.home" => "Accueil",
        "nav.about" => "À propos",
        "nav.bugs" => "Bogues",
        "nav.search" => "Rechercher",
        "nav.users" => "Utilisateurs",
        "nav.profile" => "Profil",
        "nav.login" => "Connexion",
        "nav.logout" => "Déconnexion",
        "nav.register" => "S'inscrire",

        "home.welcome" => "Bienvenue dans le suivi des bogues",
        "home.intro" => "Suivez, assignez et résolvez les bogues avec votre équipe.",
        "home.greeting" => "Connecté en tant que {0}.",
        "home.stats" => "{0} bogues suivis.",
        "about.title" => "À propos",
        "about.body" => "Un petit outil de suivi des anomalies multi-utilisateur. Les administrateurs gèrent les comptes ; les autres signalent et traitent les bogues.",

        "login.title" => "Connexion",
        "login.submit" => "Se connecter",
        "login.error" => "Nom d'utilisateur ou mot de passe invalide.",
        "login.logout" => "Vous avez été déconnecté.",
        "register.title" => "Créer un compte",
        "register.submit" => "S'inscrire",

        "field.username" => "Nom d'utilisateur",
        "field.password" => "Mot de passe",
        "field.first_name" => "Prénom",
        "field.last_name" => "Nom",
        "field.email" => "Courriel",
        "field.admin" => "Administrateur",
        "field.role" => "Rôle",
        "field.title" => "Titre",
        "field.description" => "Description",
        "field.priority" => "Priorité",
        "field.status" => "Statut",
        "field.assignees" => "Utilisateurs assignés",
        "field.created_at" => "Créé le",
        "field.updated_at" => "Modifié le",

        "bugs.title" => "Bogues",
        "bugs.new" => "Signaler un bogue",
        "bugs.edit" => "Modifier le bogue",
        "bugs.empty" => "Aucun bogue trouvé.",
        "bugs.unassigned" => "Personne n'est assigné.",
        "bugs.assign" => "Assigner",
        "bugs.unassign" => "Retirer",
        "bugs.delete" => "Supprimer le bogue",

        "search.title" => "Rechercher des bogues",
        "search.field" => "Champ",
        "search.value" => "Valeur",
        "search.exact" => "Correspondance exacte",
        "search.submit" => "Rechercher",
        "search.results" => "{0} bogues correspondants.",
        "search.value.required" => "Saisissez une valeur à rechercher.",
        "search.value.invalid" => "Cette valeur n'est pas valide pour le champ choisi.",
        "search.field.invalid" => "Champ de recherche inconnu.",

        "users.title" => "Utilisateurs",
        "users.new" => "Nouvel utilisateur",
        "users.edit" => "Modifier l'utilisateur",
        "users.empty" => "Aucun utilisateur trouvé.",
        "users.delete" => "Supprimer",

        "profile.title" => "Mon profil",
        "profile.edit" => "Modifier le profil",
        "profile.assigned" => "Bogues qui me sont assignés",
        "profile.password.hint" => "Laissez vide pour conserver le mot de passe actuel.",

        "action.save" => "Enregistrer",
        "action.cancel" => "Annuler",
        "action.edit" => "Modifier",
        "page.previous" => "Précédent",
        "page.next" => "Suivant",

        "flash.registered" => "Inscription réussie. Veuillez vous connecter.",
        "flash.bug.created" => "Bogue créé avec succès.",
        "flash.bug.updated" => "Bogue mis à jour avec succès.",
        "flash.bug.deleted" => "Bogue supprimé avec succès.",
        "flash.bug.assigned" => "Utilisateur assigné.",
        "flash.bug.unassigned" => "Utilisateur retiré du bogue.",
        "flash.user.created" => "Utilisateur créé avec succès.",
        "flash.user.updated" => "Utilisateur mis à jour avec succès.",
        "flash.user.deleted" => "Utilisateur supprimé avec succès.",
        "flash.profile.updated" => "Profil mis à jour avec succès.",

        "error.forbidden" => "Vous n'avez pas la permission d'accéder à cette page.",
        "error.sort.invalid" => "Ordre de tri inconnu.",

        "validation.username.required" => "Le nom d'utilisateur est obligatoire.",
        "validation.username.size" => "Le nom d'utilisateur doit comporter entre 3 et 50 caractères.",
        "validation.username.taken" => "Ce nom d'utilisateur est déjà pris.",
        "validation.password.required" => "Le mot de passe est obligatoire.",
        "validation.password.size" => "Le mot de passe doit comporter au moins 6 caractères.",
        "validation.password.size.profile" => "Le mot de passe doit comporter au moins 8 caractères.",
        "validation.name.required" => "Ce champ est obligatoire.",
        "validation.name.size" => "50 caractères au maximum.",
        "validation.email.required" => "Le courriel est obligatoire.",
        "validation.email.invalid" => "Veuillez saisir une adresse courriel valide.",
        "validation.email.taken" => "Ce courriel est déjà enregistré.",
        "validation.title.required" => "Le titre est obligatoire.",
        "validation.title.size" => "Le titre doit comporter au plus 255 caractères.",
        "validation.description.required" => "La description est obligatoire.",
        _ => return None,
    };
    Some(text)
}
